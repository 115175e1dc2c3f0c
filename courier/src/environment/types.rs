use courier_core_contact_impl::ContactFeatureServiceImpl;
use courier_core_health_impl::HealthFeatureServiceImpl;
use courier_email_impl::EmailServiceImpl;
use courier_persistence_postgres::{contact::PostgresContactRepository, PostgresDatabase};
use courier_shared_impl::{id::IdServiceImpl, time::TimeServiceImpl};

// API
pub type RestServer = courier_api_rest::RestServer<HealthFeature, ContactFeature>;

// Persistence
pub type Database = PostgresDatabase;

// Email
pub type Email = EmailServiceImpl;

// Shared
pub type Id = IdServiceImpl;
pub type Time = TimeServiceImpl;

// Repositories
pub type ContactRepo = PostgresContactRepository;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Database, Email>;
pub type ContactFeature = ContactFeatureServiceImpl<Database, Id, Time, Email, ContactRepo>;
