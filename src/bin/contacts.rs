//! Command-line client for the contacts API.

use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand};
use contacts_api::{
    client::{ContactBook, ContactForm, ContactsApi, HttpContactsApi, DEFAULT_API_URL},
    models::Contact,
};

/// Manage contacts through the contacts API
#[derive(Parser, Debug)]
#[command(name = "contacts")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the contacts collection
    #[arg(long, env = "CONTACTS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List contacts, newest first
    List {
        /// Free-text search over name, email, phone and company
        #[arg(short, long)]
        q: Option<String>,
    },

    /// Show a single contact
    Show { id: String },

    /// Create a contact
    Add {
        #[command(flatten)]
        fields: ContactFields,
    },

    /// Edit a contact; only the given fields change, an empty value clears one
    Edit {
        id: String,
        #[command(flatten)]
        fields: ContactFields,
    },

    /// Delete a contact
    Rm {
        id: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ContactFields {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    avatar_url: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl ContactFields {
    fn apply(self, form: &mut ContactForm) {
        let set = |target: &mut String, value: Option<String>| {
            if let Some(value) = value {
                *target = value;
            }
        };

        set(&mut form.first_name, self.first_name);
        set(&mut form.last_name, self.last_name);
        set(&mut form.email, self.email);
        set(&mut form.phone, self.phone);
        set(&mut form.company, self.company);
        set(&mut form.avatar_url, self.avatar_url);
        set(&mut form.notes, self.notes);
    }
}

fn print_row(contact: &Contact) {
    let name = match &contact.last_name {
        Some(last) => format!("{} {}", contact.first_name, last),
        None => contact.first_name.clone(),
    };

    println!(
        "{}  {:<28} {:<32} {:<16} {}",
        contact.id,
        name,
        contact.email,
        contact.phone.as_deref().unwrap_or("-"),
        contact.company.as_deref().unwrap_or("-"),
    );
}

fn print_details(contact: &Contact) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(contact)?);
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut book = ContactBook::new(HttpContactsApi::new(cli.api_url));

    match cli.command {
        Command::List { q } => {
            let contacts = book.search(q.unwrap_or_default()).await?;
            if contacts.is_empty() {
                println!("No contacts");
            }
            for contact in contacts {
                print_row(contact);
            }
        }
        Command::Show { id } => {
            let contact = book.api().get(&id).await?;
            print_details(&contact)?;
        }
        Command::Add { fields } => {
            fields.apply(book.form_mut());
            let contact = book.submit().await?;
            print_details(&contact)?;
        }
        Command::Edit { id, fields } => {
            let current = book.api().get(&id).await?;
            book.edit(&current);
            fields.apply(book.form_mut());
            let contact = book.submit().await?;
            print_details(&contact)?;
        }
        Command::Rm { id, yes } => {
            let removed = book
                .delete(&id, |id| yes || confirm(&format!("Delete contact {}?", id)))
                .await?;
            if removed {
                println!("Deleted {}", id);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
