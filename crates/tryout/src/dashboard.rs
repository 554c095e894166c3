//! Opportunity and application listings.

use crate::{AppResult, BackendClient, config::Config};

use tracing::instrument;

/// Print all opportunities currently open for auditions.
#[instrument(skip(client))]
pub async fn list_opportunities(client: &BackendClient) -> AppResult<()> {
    let opportunities = client.opportunities().await?;

    if opportunities.is_empty() {
        println!("No opportunities available at the moment.");
        return Ok(());
    }

    println!("Available auditions:");
    for opportunity in &opportunities {
        println!();
        println!(
            "  {} | {} [{}]",
            opportunity.title, opportunity.company, opportunity.id
        );

        let details: Vec<&str> = [
            opportunity.location.as_str(),
            opportunity.employment_type.as_str(),
            opportunity.rate.as_str(),
        ]
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
        if !details.is_empty() {
            println!("    {}", details.join(" | "));
        }

        if !opportunity.skills.is_empty() {
            println!("    skills: {}", opportunity.skills.join(", "));
        }
        println!("    questions: {}", opportunity.questions.len());
    }

    Ok(())
}

/// Print the talent's submitted auditions and their review status.
#[instrument(skip(client, config))]
pub async fn list_submissions(client: &BackendClient, config: &Config) -> AppResult<()> {
    let user_id = config.require_user_id()?;
    let submissions = client.submissions(user_id).await?;

    if submissions.is_empty() {
        println!("No applications yet. Complete an audition to see it here.");
        return Ok(());
    }

    println!("My applications:");
    for submission in &submissions {
        println!(
            "  {} | {} | {} | submitted {} [{}]",
            submission.title,
            submission.company,
            submission.status_label(),
            submission.submitted_at.as_deref().unwrap_or("-"),
            submission.id,
        );
    }

    Ok(())
}
