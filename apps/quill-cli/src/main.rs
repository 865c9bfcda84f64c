//! Quill - terminal client for the posts API.

mod client;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quill_core::domain::{NewPost, PostChanges, PostId};
use quill_core::validation::{ValidationErrors, validate_new_post, validate_post_changes};
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt};

use client::{ClientError, PostsClient};

#[derive(Parser)]
#[command(name = "quill", version, about = "Read and write posts on a Quill server")]
struct Cli {
    /// Base URL of the API server.
    #[arg(
        long,
        global = true,
        env = "QUILL_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts, newest first.
    List,
    /// Show one post in full.
    Show { id: PostId },
    /// Publish a new post.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Change some fields of a post.
    Edit {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, conflicts_with = "clear_image")]
        image_url: Option<String>,
        /// Remove the post's image.
        #[arg(long)]
        clear_image: bool,
    },
    /// Delete a post.
    Delete { id: PostId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = PostsClient::new(&cli.api_url);
    tracing::debug!(api_url = %cli.api_url, "Using API server");

    match run(&client, cli.command).await {
        Ok(()) => Ok(()),
        Err(Failure::Invalid(errors)) => {
            for v in &errors.violations {
                eprintln!("{}: {}", v.field, v.message);
            }
            std::process::exit(2);
        }
        Err(Failure::Client(ClientError::Api { problem, .. })) => {
            eprintln!("{}", render::problem(&problem));
            std::process::exit(1);
        }
        Err(Failure::Client(err)) => {
            Err(err).with_context(|| format!("could not reach {}", cli.api_url))
        }
        Err(Failure::Encode(err)) => Err(err.into()),
    }
}

enum Failure {
    Invalid(ValidationErrors),
    Client(ClientError),
    Encode(serde_json::Error),
}

impl From<ClientError> for Failure {
    fn from(err: ClientError) -> Self {
        Failure::Client(err)
    }
}

impl From<ValidationErrors> for Failure {
    fn from(err: ValidationErrors) -> Self {
        Failure::Invalid(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::Encode(err)
    }
}

async fn run(client: &PostsClient, command: Command) -> Result<(), Failure> {
    match command {
        Command::List => {
            let posts = client.list().await?;
            if posts.is_empty() {
                println!("No posts yet.");
            }
            for post in &posts {
                println!("{}", render::card(post));
            }
        }
        Command::Show { id } => match client.get(id).await {
            Ok(post) => print!("{}", render::detail(&post)),
            Err(err) if err.is_not_found() => {
                eprintln!("Post not found");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        Command::Create {
            title,
            author,
            content,
            image_url,
        } => {
            let request = checked_create(CreatePostRequest {
                title,
                author,
                content,
                image_url,
            })?;
            let post = client.create(&request).await?;
            println!("Created post #{}", post.id);
        }
        Command::Edit {
            id,
            title,
            author,
            content,
            image_url,
            clear_image,
        } => {
            let request = checked_update(UpdatePostRequest {
                title,
                author,
                content,
                image_url: if clear_image { Some(None) } else { image_url.map(Some) },
            })?;
            let post = client.update(id, &request).await?;
            println!("Updated post #{}", post.id);
        }
        Command::Delete { id } => {
            client.delete(id).await?;
            println!("Deleted post #{}", id);
        }
    }
    Ok(())
}

/// Run the server's validation rules locally and send the trimmed values.
fn checked_create(request: CreatePostRequest) -> Result<CreatePostRequest, Failure> {
    let NewPost {
        title,
        author,
        content,
        image_url,
    } = validate_new_post(&as_object(&request)?)?;
    Ok(CreatePostRequest {
        title,
        author,
        content,
        image_url,
    })
}

fn checked_update(request: UpdatePostRequest) -> Result<UpdatePostRequest, Failure> {
    let PostChanges {
        title,
        author,
        content,
        image_url,
    } = validate_post_changes(&as_object(&request)?)?;
    Ok(UpdatePostRequest {
        title,
        author,
        content,
        image_url,
    })
}

fn as_object<T: Serialize>(value: &T) -> Result<serde_json::Map<String, serde_json::Value>, Failure> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, image_url: Option<&str>) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            author: "Ann".to_string(),
            content: "Body text for the test".to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    #[test]
    fn test_create_is_trimmed_before_sending() {
        let Ok(request) = checked_create(create("  Hello  ", None)) else {
            panic!("valid request rejected");
        };
        assert_eq!(request.title, "Hello");
        assert_eq!(request.image_url, None);
    }

    #[test]
    fn test_create_rejected_locally() {
        match checked_create(create("Hi", Some("ftp://example.com/a.png"))) {
            Err(Failure::Invalid(errors)) => {
                assert!(errors.for_field("title").is_some());
                assert!(errors.for_field("imageUrl").is_some());
            }
            _ => panic!("expected validation failure"),
        }
    }

    #[test]
    fn test_clear_image_survives_validation() {
        let request = UpdatePostRequest {
            image_url: Some(None),
            ..Default::default()
        };
        let Ok(checked) = checked_update(request) else {
            panic!("clearing the image should be allowed");
        };
        assert_eq!(checked.image_url, Some(None));
        assert_eq!(checked.title, None);
    }

    #[test]
    fn test_cli_parses_edit() {
        let cli = Cli::try_parse_from([
            "quill",
            "--api-url",
            "http://api.test",
            "edit",
            "3",
            "--title",
            "New title",
            "--clear-image",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://api.test");
        match cli.command {
            Command::Edit {
                id,
                title,
                clear_image,
                image_url,
                ..
            } => {
                assert_eq!(id, 3);
                assert_eq!(title.as_deref(), Some("New title"));
                assert!(clear_image);
                assert_eq!(image_url, None);
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_cli_rejects_image_and_clear_together() {
        let parsed = Cli::try_parse_from([
            "quill",
            "edit",
            "3",
            "--image-url",
            "https://example.com/a.png",
            "--clear-image",
        ]);
        assert!(parsed.is_err());
    }
}
