use uuid::Uuid;

use super::{BlogService, REQUIRED};
use crate::domain::{Comment, CommentInput};
use crate::error::{DomainError, FieldErrors};
use crate::policy;

impl BlogService {
    /// Comment on an existing post.
    pub async fn add_comment(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        input: CommentInput,
    ) -> Result<Comment, DomainError> {
        let post = self.load_post(post_id).await?;
        check_text(&input)?;

        let comment = Comment::new(post.id, viewer, input);
        Ok(self.repos.comments.insert(comment).await?)
    }

    /// The comment `viewer` wants to edit or delete, provided they wrote it.
    pub async fn owned_comment(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .repos
            .comments
            .find_for_post(post_id, comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        if !policy::can_modify(viewer, &comment) {
            return Err(DomainError::Forbidden(
                "only the author may change this comment",
            ));
        }
        Ok(comment)
    }

    pub async fn update_comment(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        input: CommentInput,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.owned_comment(viewer, post_id, comment_id).await?;
        check_text(&input)?;

        comment.text = input.text;
        Ok(self.repos.comments.update(comment).await?)
    }

    pub async fn delete_comment(
        &self,
        viewer: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        let comment = self.owned_comment(viewer, post_id, comment_id).await?;
        self.repos.comments.delete(comment.id).await?;
        Ok(comment)
    }
}

fn check_text(input: &CommentInput) -> Result<(), DomainError> {
    let mut errors = FieldErrors::new();
    if input.text.trim().is_empty() {
        errors.add("text", REQUIRED);
    }
    errors.into_result()
}
