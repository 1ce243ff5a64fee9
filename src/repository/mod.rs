//! Repository layer for database operations

pub mod attestations;
pub mod departments;
pub mod history;
pub mod requests;
pub mod rooms;
pub mod software;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub departments: departments::DepartmentsRepository,
    pub rooms: rooms::RoomsRepository,
    pub software: software::SoftwareRepository,
    pub users: users::UsersRepository,
    pub requests: requests::RequestsRepository,
    pub attestations: attestations::AttestationsRepository,
    pub history: history::HistoryRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            departments: departments::DepartmentsRepository::new(pool.clone()),
            rooms: rooms::RoomsRepository::new(pool.clone()),
            software: software::SoftwareRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            attestations: attestations::AttestationsRepository::new(pool.clone()),
            history: history::HistoryRepository::new(pool.clone()),
            pool,
        }
    }
}
