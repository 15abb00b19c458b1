use std::path::PathBuf;

use ansi_term::{Colour, Style};
use anyhow::Result;
use clap::Subcommand;

use crate::{
    store::{
        entities::{Priority, Todo, TodoStatus},
        json_store::JsonStore,
    },
    utils::clock::{Clock, DefaultClock},
};

use super::{confirm, warn_user};

#[derive(Debug, Subcommand)]
pub enum TodoCommand {
    #[command(about = "Add a todo")]
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    #[command(about = "List todos")]
    List,
    #[command(about = "Edit fields of a todo; omitted fields keep their value")]
    Edit {
        index: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        status: Option<TodoStatus>,
    },
    #[command(about = "Mark a todo as done")]
    Done { index: usize },
    #[command(about = "Delete a todo")]
    Rm {
        index: usize,
        #[arg(long, help = "Skip the confirmation question")]
        yes: bool,
    },
}

pub async fn process_todo_command(dir: PathBuf, command: TodoCommand) -> Result<()> {
    let mut todos = JsonStore::<Todo>::open(&dir).await;
    let clock = DefaultClock;

    match command {
        TodoCommand::Add {
            title,
            description,
            priority,
        } => {
            let now = clock.time();
            let todo = Todo {
                title,
                description,
                priority,
                status: TodoStatus::Pending,
                created_time: now,
                updated_time: now,
            };
            if let Err(e) = todos.create(todo, now).await {
                warn_user(e);
            }
        }
        TodoCommand::List => print_list(&todos),
        TodoCommand::Edit {
            index,
            title,
            description,
            priority,
            status,
        } => {
            let Some(todo) = todos.get(index) else {
                warn_user(format!("no todo #{index}"));
                return Ok(());
            };
            let mut edited = todo.clone();
            if let Some(title) = title {
                edited.title = title;
            }
            if let Some(description) = description {
                edited.description = description;
            }
            if let Some(priority) = priority {
                edited.priority = priority;
            }
            if let Some(status) = status {
                edited.status = status;
            }
            if let Err(e) = todos.update(index, edited, clock.time()).await {
                warn_user(e);
            }
        }
        TodoCommand::Done { index } => {
            let Some(todo) = todos.get(index) else {
                warn_user(format!("no todo #{index}"));
                return Ok(());
            };
            let mut done = todo.clone();
            done.status = TodoStatus::Done;
            if let Err(e) = todos.update(index, done, clock.time()).await {
                warn_user(e);
            }
        }
        TodoCommand::Rm { index, yes } => {
            if confirm(&format!("Delete todo #{index}?"), yes)?
                && todos.remove(Some(index)).await.is_none()
            {
                warn_user(format!("no todo #{index}"));
            }
        }
    }
    Ok(())
}

fn priority_colour(priority: Priority) -> Colour {
    match priority {
        Priority::Low => Colour::Green,
        Priority::Medium => Colour::Yellow,
        Priority::High => Colour::Red,
    }
}

fn print_list(todos: &JsonStore<Todo>) {
    if todos.is_empty() {
        println!("The todo list is empty.");
        return;
    }
    for (index, todo) in todos.records().iter().enumerate() {
        let title = if todo.status == TodoStatus::Done {
            Style::new().strikethrough().paint(&todo.title)
        } else {
            Style::new().paint(&todo.title)
        };
        println!(
            "  #{index} [{}] {} ({})",
            priority_colour(todo.priority).paint(todo.priority.to_string()),
            title,
            todo.status,
        );
        if !todo.description.is_empty() {
            println!("      {}", todo.description);
        }
    }
}
