use tabled::builder::Builder;
use tabled::settings::Style;
use todo_core::app::TodoApp;
use todo_core::error::AppError;
use todo_core::model::Task;
use todo_core::storage::KeyValueStorage;
use todo_core::theme::Palette;

const TITLE: &str = "TodoApp";
const EMPTY_LIST: &str = "(no tasks)";

fn checkbox(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

/// Renders the whole screen: title, theme switch, input field, and task rows.
pub fn render<S: KeyValueStorage>(app: &TodoApp<S>, palette: &Palette) -> String {
    let mut screen = String::new();

    let switch_hint = format!("[theme: {}]", app.theme());
    screen.push_str(&format!(
        "{}  {}\n",
        palette.textize(TITLE),
        palette.mutedize(&switch_hint)
    ));
    screen.push_str(&format!("> {}\n", app.input()));
    screen.push_str(&render_tasks(app.tasks(), palette));
    screen
}

pub fn render_tasks(tasks: &[Task], palette: &Palette) -> String {
    if tasks.is_empty() {
        return format!("{}\n", palette.mutedize(EMPTY_LIST));
    }

    let mut builder = Builder::default();
    builder.push_record([String::from("#"), String::from("done"), String::from("task")]);

    for (index, task) in tasks.iter().enumerate() {
        let text = if task.completed {
            palette.strike_through(&task.text)
        } else {
            palette.textize(&task.text)
        };
        builder.push_record([(index + 1).to_string(), checkbox(task).to_string(), text]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    format!("{table}\n")
}

pub fn tasks_json(tasks: &[Task]) -> Result<String, AppError> {
    Ok(serde_json::to_string(tasks)?)
}
