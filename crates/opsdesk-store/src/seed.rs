// SPDX-FileCopyrightText: 2026 Opsdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo dataset for local development and dashboard screenshots.
//!
//! Seeds four users, three authored tickets with back-dated timestamps,
//! twenty randomized filler tickets, and two knowledge base articles.

use chrono::{Duration, Utc};
use rand::Rng;

use opsdesk_core::error::OpsdeskError;
use opsdesk_core::traits::Storage;
use opsdesk_core::types::{
    NewKbArticle, NewTicket, NewUser, Severity, TicketPriority, TicketStatus, UserRole,
};

use crate::memory::MemStorage;

/// Populate `storage` with the demo dataset.
pub async fn seed_demo_data(storage: &MemStorage) -> Result<(), OpsdeskError> {
    let john = storage
        .create_user(demo_user("johnsmith", "John Smith", "IT Support", UserRole::Agent))
        .await?;
    let sarah = storage
        .create_user(demo_user("sarahconnor", "Sarah Connor", "Support", UserRole::Agent))
        .await?;
    let david = storage
        .create_user(demo_user("davidmiller", "David Miller", "Support", UserRole::Agent))
        .await?;
    let jane = storage
        .create_user(demo_user("janeuser", "Jane User", "Finance", UserRole::User))
        .await?;

    let email_ticket = storage
        .create_ticket(NewTicket {
            title: Some("Cannot access email after password reset".to_string()),
            description: Some(
                "After resetting my password, I can no longer access my email account. \
                 I get an \"invalid credentials\" error even though I am sure I am using \
                 the correct password."
                    .to_string(),
            ),
            status: Some(TicketStatus::Open),
            priority: Some(TicketPriority::High),
            category: Some("software".to_string()),
            sub_category: Some("email".to_string()),
            impact: Some(Severity::Medium),
            urgency: Some(Severity::High),
            assigned_to_id: Some(sarah.id),
            reported_by_id: Some(jane.id),
            configuration_item: Some("Email System".to_string()),
            caller_location: Some("Headquarters".to_string()),
            issue_location: Some("Headquarters".to_string()),
            preferred_contact: Some("email".to_string()),
        })
        .await?;
    storage.backdate_ticket(email_ticket.id, Utc::now() - Duration::hours(2));

    let vpn_ticket = storage
        .create_ticket(NewTicket {
            title: Some("VPN connection issues when working remotely".to_string()),
            description: Some(
                "I am having trouble connecting to the VPN when working from home. \
                 The connection keeps dropping every few minutes."
                    .to_string(),
            ),
            status: Some(TicketStatus::InProgress),
            priority: Some(TicketPriority::Medium),
            category: Some("network".to_string()),
            sub_category: Some("vpn".to_string()),
            impact: Some(Severity::Medium),
            urgency: Some(Severity::Medium),
            assigned_to_id: Some(john.id),
            reported_by_id: Some(jane.id),
            configuration_item: Some("VPN".to_string()),
            caller_location: Some("Remote".to_string()),
            issue_location: Some("Remote".to_string()),
            preferred_contact: Some("phone".to_string()),
        })
        .await?;
    storage.backdate_ticket(vpn_ticket.id, Utc::now() - Duration::hours(3));

    let access_ticket = storage
        .create_ticket(NewTicket {
            title: Some("Need access to finance department shared drive".to_string()),
            description: Some(
                "I need access to the finance department shared drive to complete my \
                 quarterly report."
                    .to_string(),
            ),
            status: Some(TicketStatus::Pending),
            priority: Some(TicketPriority::Low),
            category: Some("access".to_string()),
            sub_category: Some("file_access".to_string()),
            impact: Some(Severity::Low),
            urgency: Some(Severity::Medium),
            assigned_to_id: Some(david.id),
            reported_by_id: Some(jane.id),
            configuration_item: Some("Shared Drive".to_string()),
            caller_location: Some("Headquarters".to_string()),
            issue_location: Some("Headquarters".to_string()),
            preferred_contact: Some("email".to_string()),
        })
        .await?;
    storage.backdate_ticket(access_ticket.id, Utc::now() - Duration::days(1));

    // Filler tickets so the dashboard has meaningful distributions. The
    // rng is scoped per iteration; ThreadRng must not live across awaits.
    let agents = [john.id, sarah.id, david.id];
    for i in 0..20 {
        let (status, priority, assignee) = {
            let mut rng = rand::thread_rng();
            (
                TicketStatus::ALL[rng.gen_range(0..TicketStatus::ALL.len())],
                TicketPriority::ALL[rng.gen_range(0..TicketPriority::ALL.len())],
                agents[rng.gen_range(0..agents.len())],
            )
        };

        storage
            .create_ticket(NewTicket {
                title: Some(format!("Ticket {}", i + 4)),
                description: Some(format!("This is a random ticket {} for testing purposes.", i + 4)),
                status: Some(status),
                priority: Some(priority),
                category: Some("other".to_string()),
                sub_category: Some("general".to_string()),
                impact: Some(Severity::Medium),
                urgency: Some(Severity::Medium),
                assigned_to_id: Some(assignee),
                reported_by_id: Some(jane.id),
                ..Default::default()
            })
            .await?;
    }

    storage
        .create_kb_article(NewKbArticle {
            title: Some("Resetting your password".to_string()),
            content: Some(
                "Use the self-service portal to reset your password. Allow up to five \
                 minutes for the change to propagate to email."
                    .to_string(),
            ),
            author_id: Some(john.id),
            is_published: Some(true),
            ..Default::default()
        })
        .await?;
    storage
        .create_kb_article(NewKbArticle {
            title: Some("VPN setup for remote work".to_string()),
            content: Some("Install the corporate VPN client and sign in with your domain account.".to_string()),
            author_id: Some(sarah.id),
            is_published: Some(false),
            ..Default::default()
        })
        .await?;

    tracing::info!("demo data seeded: 4 users, 23 tickets, 2 kb articles");
    Ok(())
}

fn demo_user(username: &str, full_name: &str, department: &str, role: UserRole) -> NewUser {
    NewUser {
        username: Some(username.to_string()),
        password: Some("password123".to_string()),
        full_name: Some(full_name.to_string()),
        email: Some(format!("{}@example.com", full_name.to_lowercase().replace(' ', "."))),
        role: Some(role),
        department: Some(department.to_string()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsdesk_core::types::TicketFilter;

    #[tokio::test]
    async fn seeding_populates_every_table() {
        let store = MemStorage::new();
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.users().await.unwrap().len(), 4);
        assert_eq!(store.tickets(&TicketFilter::default()).await.unwrap().len(), 23);
        assert_eq!(store.kb_articles().await.unwrap().len(), 2);
        assert_eq!(store.published_kb_articles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_tickets_are_backdated_for_recency_ordering() {
        let store = MemStorage::new();
        seed_demo_data(&store).await.unwrap();

        let recent = store.recent_tickets(5).await.unwrap();
        assert_eq!(recent.len(), 5);
        // The filler tickets were created "now"; the three authored tickets
        // are older and must not lead the recent list.
        assert!(recent.iter().all(|t| t.id > 3));
    }
}
