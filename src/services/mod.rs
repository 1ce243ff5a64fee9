//! Business logic services

pub mod attestations;
pub mod departments;
pub mod history;
pub mod installations;
pub mod requests;
pub mod rooms;
pub mod software;
pub mod sync;
pub mod users;

use crate::{
    config::{AttestationConfig, AuthConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub departments: departments::DepartmentsService,
    pub rooms: rooms::RoomsService,
    pub software: software::SoftwareService,
    pub users: users::UsersService,
    pub requests: requests::RequestsService,
    pub installations: installations::InstallationsService,
    pub attestations: attestations::AttestationsService,
    pub history: history::HistoryService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        attestation_config: AttestationConfig,
    ) -> AppResult<Self> {
        let recorder = history::HistoryRecorder::new(repository.clone());
        Ok(Self {
            departments: departments::DepartmentsService::new(repository.clone()),
            rooms: rooms::RoomsService::new(repository.clone()),
            software: software::SoftwareService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            requests: requests::RequestsService::new(repository.clone(), Some(recorder.clone())),
            installations: installations::InstallationsService::new(
                repository.clone(),
                Some(recorder),
            ),
            attestations: attestations::AttestationsService::new(
                repository.clone(),
                attestation_config,
            ),
            history: history::HistoryService::new(repository),
        })
    }
}
