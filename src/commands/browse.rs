//! Clubs, universities, and events listings

use prettytable::{row, Table};
use serde::Serialize;
use serde_json::Value;

use crate::api::endpoints;
use crate::cli::{ClubCommand, EventCommand, UniversityCommand};
use crate::commands::AppContext;
use crate::error::Result;
use crate::models::{Club, ClubMember, Event, Listing, University};

/// Dispatch a clubs subcommand.
pub async fn handle_clubs(ctx: &AppContext, command: ClubCommand) -> Result<()> {
    match command {
        ClubCommand::List {
            mine,
            popular,
            recommended,
            json,
        } => {
            let path = if mine {
                endpoints::clubs::MINE
            } else if popular {
                endpoints::clubs::POPULAR
            } else if recommended {
                endpoints::clubs::RECOMMENDED
            } else {
                endpoints::clubs::LIST
            };
            let clubs = fetch_list::<Club>(ctx, path).await?;
            output(&clubs, json, clubs_table)
        }
        ClubCommand::Search { query, json } => {
            let path = format!(
                "{}?q={}",
                endpoints::clubs::SEARCH,
                url::form_urlencoded::byte_serialize(query.as_bytes()).collect::<String>()
            );
            let clubs = fetch_list::<Club>(ctx, &path).await?;
            output(&clubs, json, clubs_table)
        }
        ClubCommand::Show { id } => {
            let club: Club = ctx.client.get_json(&endpoints::clubs::detail(&id)).await?;
            print_json(&club)
        }
        ClubCommand::Members { id, json } => {
            let members = fetch_list::<ClubMember>(ctx, &endpoints::clubs::members(&id)).await?;
            output(&members, json, members_table)
        }
        ClubCommand::Join { id } => {
            post_action(ctx, &endpoints::clubs::join(&id)).await?;
            println!("Joined club {}", id);
            Ok(())
        }
        ClubCommand::Leave { id } => {
            post_action(ctx, &endpoints::clubs::leave(&id)).await?;
            println!("Left club {}", id);
            Ok(())
        }
        ClubCommand::Verticals { id } => {
            let verticals: Value = ctx
                .client
                .get_json(&endpoints::verticals::list(&id))
                .await?;
            print_json(&verticals)
        }
        ClubCommand::Vertical { id } => {
            let vertical: Value = ctx
                .client
                .get_json(&endpoints::verticals::detail(&id))
                .await?;
            print_json(&vertical)
        }
    }
}

/// Dispatch a universities subcommand.
pub async fn handle_universities(ctx: &AppContext, command: UniversityCommand) -> Result<()> {
    match command {
        UniversityCommand::List { json } => {
            let universities =
                fetch_list::<University>(ctx, endpoints::universities::LIST).await?;
            output(&universities, json, universities_table)
        }
        UniversityCommand::Show { id } => {
            let university: University = ctx
                .client
                .get_json(&endpoints::universities::detail(&id))
                .await?;
            print_json(&university)
        }
    }
}

/// Dispatch an events subcommand.
pub async fn handle_events(ctx: &AppContext, command: EventCommand) -> Result<()> {
    match command {
        EventCommand::List { club_id, json } => {
            let events = fetch_list::<Event>(ctx, &endpoints::events::list(&club_id)).await?;
            output(&events, json, events_table)
        }
        EventCommand::Show { id } => {
            let event: Event = ctx.client.get_json(&endpoints::events::detail(&id)).await?;
            print_json(&event)
        }
        EventCommand::Register { id } => {
            post_action(ctx, &endpoints::events::register(&id)).await?;
            println!("Registered for event {}", id);
            Ok(())
        }
        EventCommand::Unregister { id } => {
            post_action(ctx, &endpoints::events::unregister(&id)).await?;
            println!("Unregistered from event {}", id);
            Ok(())
        }
        EventCommand::Attendees { id } => {
            let attendees: Value = ctx
                .client
                .get_json(&endpoints::events::attendees(&id))
                .await?;
            print_json(&attendees)
        }
    }
}

/// `POST` an empty object to an action endpoint. The reply may be empty.
async fn post_action(ctx: &AppContext, path: &str) -> Result<Value> {
    let reply: Value = ctx
        .client
        .post_json(path, &serde_json::json!({}))
        .await?;
    tracing::debug!("{} reply: {}", path, reply);
    Ok(reply)
}

async fn fetch_list<T>(ctx: &AppContext, path: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let listing: Listing<T> = ctx.client.get_json(path).await?;
    Ok(listing.into_vec())
}

fn output<T: Serialize>(items: &[T], json: bool, table: fn(&[T]) -> Table) -> Result<()> {
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("Nothing found.");
        return Ok(());
    }
    table(items).printstd();
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn clubs_table(clubs: &[Club]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "Name", "Category", "Members", "Tags"]);
    for club in clubs {
        table.add_row(row![
            club.club_id,
            club.name,
            club.category,
            club.member_count,
            club.tags.join(", ")
        ]);
    }
    table
}

fn members_table(members: &[ClubMember]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["User", "Role", "Status", "Joined"]);
    for member in members {
        table.add_row(row![
            member.user_id,
            format!("{:?}", member.role).to_lowercase(),
            format!("{:?}", member.status).to_lowercase(),
            member.joined_at
        ]);
    }
    table
}

fn universities_table(universities: &[University]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "Name", "Domain", "Location", "Status"]);
    for university in universities {
        table.add_row(row![
            university.university_id,
            university.name,
            university.domain,
            university.location.as_deref().unwrap_or("-"),
            format!("{:?}", university.status).to_lowercase()
        ]);
    }
    table
}

fn events_table(events: &[Event]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "Title", "Starts", "Ends", "Where", "Going"]);
    for event in events {
        table.add_row(row![
            event.event_id,
            event.title,
            event.start_time,
            event.end_time,
            event.venue(),
            event.attendee_count
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UniversityStatus;

    #[test]
    fn test_universities_table_has_row_per_item() {
        let universities = vec![University {
            university_id: "u1".into(),
            name: "Tech".into(),
            domain: "tech.edu".into(),
            description: None,
            location: None,
            website: None,
            logo_url: None,
            status: UniversityStatus::Pending,
        }];
        let table = universities_table(&universities);
        assert_eq!(table.len(), 2);
        assert!(table.to_string().contains("pending"));
    }

    #[test]
    fn test_events_table_shows_venue() {
        let events: Vec<Event> = serde_json::from_str(
            r#"[{"event_id":"e","club_id":"c","title":"Hack night",
                 "start_time":"s","end_time":"t","is_virtual":true}]"#,
        )
        .unwrap();
        assert!(events_table(&events).to_string().contains("online"));
    }
}
