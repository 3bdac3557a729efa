//! Shared fixtures for service tests.

#![allow(dead_code)]

use taskflow_shared::models::user::{CreateUser, User, UserRole};
use taskflow_shared::services::{project::ProjectInput, task::TaskInput, ListQuery};
use taskflow_shared::store::{EntityStore, MemoryStore};

/// Inserts a user directly, skipping password hashing
pub async fn seed_user(store: &MemoryStore, username: &str) -> User {
    store
        .create_user(CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: UserRole::User,
        })
        .await
        .expect("Failed to seed user")
}

pub fn project_input(name: &str, status: &str) -> ProjectInput {
    ProjectInput {
        name: Some(name.to_string()),
        status: Some(status.to_string()),
        ..Default::default()
    }
}

pub fn task_input(title: &str, status: &str, priority: Option<i32>) -> TaskInput {
    TaskInput {
        title: Some(title.to_string()),
        status: Some(status.to_string()),
        priority,
        ..Default::default()
    }
}

pub fn list_query(page: i64, size: i64, sort_by: &str, direction: &str) -> ListQuery {
    ListQuery {
        page,
        size,
        sort_by: sort_by.to_string(),
        direction: direction.to_string(),
    }
}
