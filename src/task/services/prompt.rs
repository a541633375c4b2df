//! Context prompt handed to a resumed agent.

use crate::task::domain::{AuthorType, BoardPrefix, Comment, Task};
use minijinja::Environment;
use serde::Serialize;

const RESUME_PROMPT_TEMPLATE: &str = "\
You are resuming work on task {{ task.display_id }}: {{ task.title }}
Column: {{ task.column }} | Priority: {{ task.priority }}
{% if task.description %}
Description:
{{ task.description }}
{% endif %}
The task was waiting for input and a human has replied. Recent comments, oldest first:
{% for comment in comments %}
- [{{ comment.created_at }}] {{ comment.author }}: {{ comment.content }}
{% endfor %}
Continue the task using this input. If you need more input, ask in a comment and move the \
task back to need_input.
";

#[derive(Serialize)]
struct PromptContext<'a> {
    task: TaskContext<'a>,
    comments: Vec<CommentContext<'a>>,
}

#[derive(Serialize)]
struct TaskContext<'a> {
    display_id: String,
    title: &'a str,
    description: Option<&'a str>,
    column: &'static str,
    priority: &'static str,
}

#[derive(Serialize)]
struct CommentContext<'a> {
    author: AuthorType,
    content: &'a str,
    created_at: String,
}

/// Renders the resume prompt for `task` from its recent `comments`.
///
/// # Errors
///
/// Returns the template engine's message when rendering fails.
pub(crate) fn render_resume_prompt(
    task: &Task,
    prefix: &BoardPrefix,
    comments: &[Comment],
) -> Result<String, String> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    let context = PromptContext {
        task: TaskContext {
            display_id: task.display_id(prefix).to_string(),
            title: task.title(),
            description: task.description(),
            column: task.column().as_str(),
            priority: task.priority().as_str(),
        },
        comments: comments
            .iter()
            .map(|comment| CommentContext {
                author: comment.author_type(),
                content: comment.content(),
                created_at: comment.created_at().to_rfc3339(),
            })
            .collect(),
    };
    environment
        .render_str(RESUME_PROMPT_TEMPLATE, context)
        .map_err(|error| error.to_string())
}
