//! Data models for Sentinela entities.
//!
//! Request and response bodies follow the backend's camelCase field
//! names via serde renames:
//!
//! - `User`, `CreateUser`, `AuthUser`, `AuthTokens`: accounts and login
//! - `Forum`, `Comment` and their `*WithOwner` variants: community posts
//! - `Complaint`: incident reports (images attached in a second step)
//! - `Municipality`, `CityIndex`: the IBGE city directory

pub mod city;
pub mod complaint;
pub mod forum;
pub mod user;

pub use city::{CityIndex, Municipality};
pub use complaint::{Complaint, CreateComplaint};
pub use forum::{
    tags_are_known, Comment, CommentOwner, CommentWithOwner, CreateComment, CreateForum, Forum,
    ForumOwner, ForumWithOwner, FORUM_TAGS,
};
pub use user::{AuthTokens, AuthUser, CreateUser, User};
