//! Terminal front end for the career advisor relay.
//!
//! Fields given as flags are used as-is; missing ones are prompted for.

use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::{style, Term};
use tracing_subscriber::EnvFilter;

use career_advisor_api::form::client::DEFAULT_ENDPOINT;
use career_advisor_api::form::render::{
    render_degree_menu, render_field_errors, render_loading, render_notification, render_results,
};
use career_advisor_api::form::{FormController, RelayClient, SubmitOutcome};
use career_advisor_api::profile::{ProfileField, DEGREES};

#[derive(Parser)]
#[command(
    name = "advisor",
    about = "Get AI career suggestions from your academic profile",
    version
)]
struct Cli {
    /// Relay function URL.
    #[arg(long, env = "ADVISOR_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Public key sent as `apikey` and bearer token.
    #[arg(long, env = "ADVISOR_ANON_KEY")]
    anon_key: Option<String>,

    /// Skills and interests, e.g. "fastapi, nodejs, docker".
    #[arg(long)]
    interests: Option<String>,

    /// Degree name or its number in --list-degrees.
    #[arg(long)]
    degree: Option<String>,

    /// CGPA between 0.0 and 4.0.
    #[arg(long)]
    cgpa: Option<String>,

    /// Career goal, e.g. "become a data scientist".
    #[arg(long)]
    career_goal: Option<String>,

    /// Print the degree list and exit.
    #[arg(long)]
    list_degrees: bool,

    /// Submit once and exit instead of offering to start over.
    #[arg(long)]
    once: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("career_advisor_api={}", cli.log_level))),
        )
        .with_writer(io::stderr)
        .init();

    let term = Term::stdout();

    if cli.list_degrees {
        term.write_str(&render_degree_menu())?;
        return Ok(());
    }

    let mut client = RelayClient::new(cli.endpoint.clone());
    if let Some(key) = &cli.anon_key {
        client = client.with_anon_key(key.clone());
    }
    let mut controller = FormController::new(client);

    let form = controller.form_mut();
    let given = [
        (ProfileField::Interests, &cli.interests),
        (ProfileField::Degree, &cli.degree),
        (ProfileField::Cgpa, &cli.cgpa),
        (ProfileField::CareerGoal, &cli.career_goal),
    ];
    for (field, value) in given {
        if let Some(value) = value {
            form.set(field, normalize(field, value));
        }
    }

    let mut input = io::stdin().lock();

    loop {
        for field in ProfileField::ALL {
            if controller.form().get(field).trim().is_empty() {
                let value = prompt(&term, &mut input, field)?;
                controller.form_mut().set(field, value);
            }
        }

        if let Err(errors) = controller.form().to_profile() {
            term.write_str(&render_field_errors(&errors))?;
            for field in errors.fields() {
                controller.form_mut().clear(field);
            }
            continue;
        }

        let placeholder = render_loading();
        let placeholder_lines = placeholder.lines().count() + 1;
        term.write_line(&style("Analyzing…").dim().to_string())?;
        term.write_str(&placeholder)?;

        let outcome = controller.submit().await;

        if term.is_term() {
            term.clear_last_lines(placeholder_lines)?;
        }

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                term.write_str(&render_field_errors(&errors))?;
                for field in errors.fields() {
                    controller.form_mut().clear(field);
                }
                continue;
            }
            SubmitOutcome::Failed(_) => {
                if let Some(notification) = controller.take_notification() {
                    term.write_line(&render_notification(&notification))?;
                }
                if cli.once || !confirm(&term, &mut input, "Try again?", true)? {
                    bail!("no recommendations received");
                }
            }
            SubmitOutcome::Succeeded => {
                if let Some(results) = controller.results() {
                    term.write_str(&render_results(results))?;
                }
                if cli.once || !confirm(&term, &mut input, "Start over?", false)? {
                    return Ok(());
                }
                controller.reset();
            }
        }
    }
}

/// Accepts a degree's menu number as well as its name.
fn normalize(field: ProfileField, value: &str) -> String {
    let value = value.trim();
    if field == ProfileField::Degree {
        if let Ok(n) = value.parse::<usize>() {
            if let Some(degree) = n.checked_sub(1).and_then(|i| DEGREES.get(i)) {
                return degree.to_string();
            }
        }
        if let Some(degree) = DEGREES.iter().find(|d| d.eq_ignore_ascii_case(value)) {
            return degree.to_string();
        }
    }
    value.to_string()
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        bail!("input closed before the form was complete");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt(term: &Term, input: &mut impl BufRead, field: ProfileField) -> Result<String> {
    if field == ProfileField::Degree {
        term.write_str(&render_degree_menu())?;
    }
    term.write_str(&format!("{}: ", style(field.label()).bold()))?;
    let value = read_line(input)?;
    Ok(normalize(field, &value))
}

fn confirm(term: &Term, input: &mut impl BufRead, question: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    term.write_str(&format!("{question} {hint} "))?;
    let answer = read_line(input)?;
    Ok(match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}
