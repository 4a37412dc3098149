//! Fake catalog content for local development and demos.

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::{Paragraph, Word};
use fake::faker::name::en::{FirstName, Name};
use rand::Rng;
use rand::seq::SliceRandom;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::entities::{Environment, category, user};
use crate::store::games::GameDraft;
use crate::store::{self, StoreError};
use crate::utils::slugify;
use crate::validation::CommentDraft;

/// Built-in category titles.
pub const GAME_CATEGORIES: [&str; 11] = [
    "Tag",
    "Hide and Seek",
    "Juggling",
    "Hunting",
    "Fishing",
    "Hiking",
    "Square",
    "Walking",
    "Getting Acquainted",
    "Tidying Up",
    "Day Review",
];

/// Users created by [`SeedTarget::All`].
const ALL_USERS: usize = 5;
/// Comment text is cut to this many characters.
const COMMENT_TEXT_LEN: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SeedTarget {
    All,
    Games,
    Categories,
    Comments,
    Users,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("No {0} found, please create {0} first.")]
    MissingPrerequisite(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// How many rows of each kind were created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub categories: usize,
    pub games: usize,
    pub comments: usize,
}

/// Seed `target` with `count` rows.
///
/// # Errors
///
/// `MissingPrerequisite` when games are requested without categories, or comments
/// without games or users.
pub async fn run(
    db: &DatabaseConnection,
    target: SeedTarget,
    count: usize,
    now: DateTime<Utc>,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    match target {
        SeedTarget::All => {
            report.users = seed_users(db, ALL_USERS, now).await?;
            report.categories = seed_categories(db, GAME_CATEGORIES.len(), now).await?;
            report.games = seed_games(db, count, now).await?;
            report.comments = seed_comments(db, count, now).await?;
        }
        SeedTarget::Users => report.users = seed_users(db, count, now).await?,
        SeedTarget::Categories => report.categories = seed_categories(db, count, now).await?,
        SeedTarget::Games => report.games = seed_games(db, count, now).await?,
        SeedTarget::Comments => report.comments = seed_comments(db, count, now).await?,
    }
    Ok(report)
}

/// Keep going past rows that already exist; fail on anything else.
fn skip_conflict<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_conflict() => {
            tracing::debug!("Skipping existing row: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// # Errors
///
/// Returns a store error other than a duplicate username.
pub async fn seed_users(
    db: &DatabaseConnection,
    count: usize,
    now: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let blueprints: Vec<(String, String)> = (0..count)
        .map(|i| {
            let username: String = Username().fake();
            (format!("{username}_{i}"), Name().fake())
        })
        .collect();

    let mut created = 0;
    for (username, name) in blueprints {
        let result = store::users::create(db, &username, &name, "user", now).await;
        if skip_conflict(result)?.is_some() {
            created += 1;
        }
    }

    tracing::info!(count = created, "Created {created} users.");
    Ok(created)
}

/// Create up to `count` of the built-in categories, skipping those already present.
///
/// # Errors
///
/// Returns a store error other than a duplicate slug.
pub async fn seed_categories(
    db: &DatabaseConnection,
    count: usize,
    now: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let mut created = 0;
    for title in GAME_CATEGORIES.iter().take(count) {
        let description: String = Paragraph(1..3).fake();
        let draft = store::categories::CategoryDraft {
            title: (*title).to_string(),
            slug: None,
            description,
        };
        if skip_conflict(store::categories::create(db, draft, now).await)?.is_some() {
            created += 1;
        }
    }

    tracing::info!(count = created, "Created {created} categories.");
    Ok(created)
}

fn game_blueprints(count: usize, categories: &[category::Model]) -> Vec<GameDraft> {
    const ENVIRONMENTS: [Environment; 3] =
        [Environment::Outdoor, Environment::Indoor, Environment::Both];

    let mut rng = rand::thread_rng();
    let mut drafts = Vec::with_capacity(count);
    for i in 0..count {
        let Some(category) = categories.choose(&mut rng) else {
            break;
        };
        let first_name: String = FirstName().fake_with_rng(&mut rng);
        let title = format!("{} by {first_name}", category.title);
        let word: String = Word().fake_with_rng(&mut rng);

        drafts.push(GameDraft {
            slug: Some(slugify(&format!("{title} {i}"))),
            title,
            description: Paragraph(1..3).fake_with_rng(&mut rng),
            min_players: rng.gen_range(2..=15),
            max_players: rng.gen_range(20..=100),
            min_duration: rng.gen_range(5..=30),
            max_duration: rng.gen_range(40..=90),
            environment: ENVIRONMENTS.choose(&mut rng).copied().unwrap_or(Environment::Outdoor),
            category_id: Some(category.id),
            is_active: true,
            attachments: None,
            equipment: vec![word],
        });
    }
    drafts
}

/// # Errors
///
/// `MissingPrerequisite` when there are no categories.
pub async fn seed_games(
    db: &DatabaseConnection,
    count: usize,
    now: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let categories = store::categories::list(db).await?;
    if categories.is_empty() {
        return Err(SeedError::MissingPrerequisite("categories"));
    }

    let mut created = 0;
    for draft in game_blueprints(count, &categories) {
        if skip_conflict(store::games::create(db, draft, now).await)?.is_some() {
            created += 1;
        }
    }

    tracing::info!(count = created, "Created {created} games.");
    Ok(created)
}

fn comment_blueprints(count: usize, game_ids: &[i32], user_ids: &[i32]) -> Vec<CommentDraft> {
    let mut rng = rand::thread_rng();
    let mut drafts = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(&game_id), Some(&author_id)) =
            (game_ids.choose(&mut rng), user_ids.choose(&mut rng))
        else {
            break;
        };
        let paragraph: String = Paragraph(1..3).fake_with_rng(&mut rng);
        let text: String = paragraph.chars().take(COMMENT_TEXT_LEN).collect();

        drafts.push(CommentDraft {
            game_id,
            author_id: Some(author_id),
            parent_id: None,
            text: text.trim().to_string(),
            rating: Some(rng.gen_range(1..=10)),
            upvotes: rng.gen_range(0..=5),
            downvotes: rng.gen_range(0..=5),
            attachment: None,
        });
    }
    drafts
}

/// # Errors
///
/// `MissingPrerequisite` when there are no games or no users.
pub async fn seed_comments(
    db: &DatabaseConnection,
    count: usize,
    now: DateTime<Utc>,
) -> Result<usize, SeedError> {
    let game_ids: Vec<i32> = store::games::list_all(db)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    if game_ids.is_empty() {
        return Err(SeedError::MissingPrerequisite("games"));
    }
    let user_ids: Vec<i32> = user::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect();
    if user_ids.is_empty() {
        return Err(SeedError::MissingPrerequisite("users"));
    }

    let mut created = 0;
    for draft in comment_blueprints(count, &game_ids, &user_ids) {
        store::comments::create(db, draft, now).await?;
        created += 1;
    }

    tracing::info!(count = created, "Created {created} comments.");
    Ok(created)
}
