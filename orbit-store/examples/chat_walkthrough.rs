/// Walk through a chat exchange against the demo dataset
///
/// Run with: cargo run --example chat_walkthrough
use chrono::Utc;
use orbit_store::formatting::{format_message_time, format_number, format_time_ago};
use orbit_store::logging::{self, LogConfig};
use orbit_store::{MemoryPreferenceStorage, SeedData, Store, StoreConfig, StoreHandle};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StoreConfig {
        logging: LogConfig::disabled(),
        ..Default::default()
    };
    logging::init_logging(&config.logging)?;

    let store = Store::new(
        SeedData::demo(),
        config,
        Box::new(MemoryPreferenceStorage::new()),
    )?;
    let (handle, task) = StoreHandle::spawn(store);

    let now = Utc::now();
    let feed = handle.snapshot().await?;
    println!("=== Feed ===");
    for post in &feed.posts {
        println!(
            "{:<16} {:>8}  {} likes  {} comments",
            post.author.name,
            format_time_ago(&post.created_at, &now),
            format_number(post.likes),
            format_number(post.comments)
        );
    }

    let conversation = feed
        .conversations
        .iter()
        .find(|c| c.messages.is_empty())
        .map(|c| (c.id, c.user.name.clone()));

    if let Some((id, name)) = conversation {
        println!("\n=== Chat with {} ===", name);
        handle.send_message(id, "Hey, congrats on the round!".to_string(), None).await?;

        tokio::time::sleep(Duration::from_millis(2600)).await;

        let snapshot = handle.snapshot().await?;
        if let Some(conversation) = snapshot.conversation(id) {
            for message in &conversation.messages {
                let who = if message.sender_id == snapshot.current_user.id {
                    "me"
                } else {
                    conversation.user.name.as_str()
                };
                println!(
                    "[{}] {}: {}",
                    format_message_time(&message.created_at, &Utc::now()),
                    who,
                    message.content.as_deref().unwrap_or("(image)")
                );
            }
        }
        println!("Unread messages: {}", snapshot.unread_messages_count);
    }

    handle.shutdown().await?;
    task.await?;
    Ok(())
}
