//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema's constraints: unique usernames and slugs,
//! foreign keys, cascading deletes for posts/comments and `SET NULL` for a
//! post's category and location.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, FeedEntry, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::feed::FeedQuery;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// Every repository backed by a set of `HashMap`s behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

macro_rules! table_repository {
    ($entity:ty, $table:ident, check = $check:path, on_delete = $on_delete:path) => {
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for InMemoryBlogStore {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<$entity>, RepoError> {
                Ok(self.tables.read().await.$table.get(&id).cloned())
            }

            async fn insert(&self, entity: $entity) -> Result<$entity, RepoError> {
                let mut tables = self.tables.write().await;
                if tables.$table.contains_key(&entity.id) {
                    return Err(RepoError::Constraint(format!(
                        "duplicate key value {}",
                        entity.id
                    )));
                }
                $check(&tables, &entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn update(&self, entity: $entity) -> Result<$entity, RepoError> {
                let mut tables = self.tables.write().await;
                if !tables.$table.contains_key(&entity.id) {
                    return Err(RepoError::NotFound);
                }
                $check(&tables, &entity)?;
                tables.$table.insert(entity.id, entity.clone());
                Ok(entity)
            }

            async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
                let mut tables = self.tables.write().await;
                if tables.$table.remove(&id).is_none() {
                    return Err(RepoError::NotFound);
                }
                $on_delete(&mut tables, id);
                Ok(())
            }
        }
    };
}

table_repository!(User, users, check = unique_username, on_delete = drop_user_content);
table_repository!(Category, categories, check = unique_slug, on_delete = detach_category);
table_repository!(Location, locations, check = accept, on_delete = detach_location);
table_repository!(Post, posts, check = post_references, on_delete = drop_post_comments);
table_repository!(Comment, comments, check = comment_references, on_delete = keep);

fn accept<T>(_: &Tables, _: &T) -> Result<(), RepoError> {
    Ok(())
}

fn keep(_: &mut Tables, _: Uuid) {}

fn unique_username(tables: &Tables, user: &User) -> Result<(), RepoError> {
    let taken = tables
        .users
        .values()
        .any(|u| u.username == user.username && u.id != user.id);
    if taken {
        return Err(RepoError::Constraint(format!(
            "duplicate key value for users.username: {}",
            user.username
        )));
    }
    Ok(())
}

fn unique_slug(tables: &Tables, category: &Category) -> Result<(), RepoError> {
    let taken = tables
        .categories
        .values()
        .any(|c| c.slug == category.slug && c.id != category.id);
    if taken {
        return Err(RepoError::Constraint(format!(
            "duplicate key value for categories.slug: {}",
            category.slug
        )));
    }
    Ok(())
}

fn post_references(tables: &Tables, post: &Post) -> Result<(), RepoError> {
    if !tables.users.contains_key(&post.author_id) {
        return Err(RepoError::Constraint("foreign key posts.author_id".to_string()));
    }
    if post
        .category_id
        .is_some_and(|id| !tables.categories.contains_key(&id))
    {
        return Err(RepoError::Constraint("foreign key posts.category_id".to_string()));
    }
    if post
        .location_id
        .is_some_and(|id| !tables.locations.contains_key(&id))
    {
        return Err(RepoError::Constraint("foreign key posts.location_id".to_string()));
    }
    Ok(())
}

fn comment_references(tables: &Tables, comment: &Comment) -> Result<(), RepoError> {
    if !tables.posts.contains_key(&comment.post_id) {
        return Err(RepoError::Constraint("foreign key comments.post_id".to_string()));
    }
    if !tables.users.contains_key(&comment.author_id) {
        return Err(RepoError::Constraint("foreign key comments.author_id".to_string()));
    }
    Ok(())
}

fn drop_user_content(tables: &mut Tables, user_id: Uuid) {
    let posts: Vec<Uuid> = tables
        .posts
        .values()
        .filter(|p| p.author_id == user_id)
        .map(|p| p.id)
        .collect();
    for post_id in posts {
        tables.posts.remove(&post_id);
        drop_post_comments(tables, post_id);
    }
    tables.comments.retain(|_, c| c.author_id != user_id);
}

fn detach_category(tables: &mut Tables, category_id: Uuid) {
    for post in tables.posts.values_mut() {
        if post.category_id == Some(category_id) {
            post.category_id = None;
        }
    }
}

fn detach_location(tables: &mut Tables, location_id: Uuid) {
    for post in tables.posts.values_mut() {
        if post.location_id == Some(location_id) {
            post.location_id = None;
        }
    }
}

fn drop_post_comments(tables: &mut Tables, post_id: Uuid) {
    tables.comments.retain(|_, c| c.post_id != post_id);
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryBlogStore {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn feed(
        &self,
        query: FeedQuery,
        page: PageRequest,
    ) -> Result<Page<FeedEntry>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| {
                let category = post.category_id.and_then(|id| tables.categories.get(&id));
                query.admits(post, category)
            })
            .collect();
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let total_items = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .map(|post| FeedEntry {
                post: post.clone(),
                comment_count: tables
                    .comments
                    .values()
                    .filter(|c| c.post_id == post.id)
                    .count() as u64,
            })
            .collect();

        Ok(Page::new(items, page, total_items))
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::domain::{CommentInput, PostInput};
    use chrono::Utc;

    async fn store_with_author() -> (InMemoryBlogStore, User) {
        let store = InMemoryBlogStore::new();
        let user = User::new("anna".into(), "anna@example.com".into(), "hash".into());
        let user = BaseRepository::<User, Uuid>::insert(&store, user).await.unwrap();
        (store, user)
    }

    fn post_for(author: &User, category_id: Option<Uuid>) -> Post {
        Post::new(
            author.id,
            PostInput {
                title: "Hello".to_string(),
                text: "World".to_string(),
                image: None,
                pub_date: Utc::now(),
                location_id: None,
                category_id,
                is_published: true,
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (store, _) = store_with_author().await;
        let twin = User::new("anna".into(), "other@example.com".into(), "hash".into());

        let result = BaseRepository::<User, Uuid>::insert(&store, twin).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let store = InMemoryBlogStore::new();
        let ghost = User::new("ghost".into(), "g@example.com".into(), "hash".into());

        let result = BaseRepository::<Post, Uuid>::insert(&store, post_for(&ghost, None)).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_deleting_post_cascades_to_comments() {
        let (store, author) = store_with_author().await;
        let post = BaseRepository::<Post, Uuid>::insert(&store, post_for(&author, None))
            .await
            .unwrap();
        let comment = Comment::new(
            post.id,
            author.id,
            CommentInput {
                text: "First!".to_string(),
            },
        );
        let comment = BaseRepository::<Comment, Uuid>::insert(&store, comment).await.unwrap();

        BaseRepository::<Post, Uuid>::delete(&store, post.id).await.unwrap();

        let found = BaseRepository::<Comment, Uuid>::find_by_id(&store, comment.id).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_deleting_category_nulls_post_category() {
        let (store, author) = store_with_author().await;
        let category = Category::new("Travel", "Trips", "travel");
        let category = BaseRepository::<Category, Uuid>::insert(&store, category).await.unwrap();
        let post = BaseRepository::<Post, Uuid>::insert(&store, post_for(&author, Some(category.id)))
            .await
            .unwrap();

        BaseRepository::<Category, Uuid>::delete(&store, category.id).await.unwrap();

        let post = BaseRepository::<Post, Uuid>::find_by_id(&store, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.category_id, None);
    }

    #[tokio::test]
    async fn test_find_for_post_checks_parent() {
        let (store, author) = store_with_author().await;
        let post = BaseRepository::<Post, Uuid>::insert(&store, post_for(&author, None))
            .await
            .unwrap();
        let comment = Comment::new(
            post.id,
            author.id,
            CommentInput {
                text: "Hi".to_string(),
            },
        );
        let comment = BaseRepository::<Comment, Uuid>::insert(&store, comment).await.unwrap();

        assert!(
            store
                .find_for_post(post.id, comment.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_for_post(Uuid::new_v4(), comment.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
