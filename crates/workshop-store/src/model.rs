//! # Workshop Entities
//!
//! Plain value records managed by the workshop's repositories. Each carries a
//! nil [`Uuid`] until a repository registers it.

use crate::entity::Entity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

impl Entity for Client {
    fn id(&self) -> Uuid {
        self.id
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: u16,
}

impl Vehicle {
    pub fn new(
        owner_id: Uuid,
        plate: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        year: u16,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            owner_id,
            plate: plate.into(),
            make: make.into(),
            model: model.into(),
            year,
        }
    }

    /// "Make Model Plate", the text vehicle searches match against.
    pub fn description(&self) -> String {
        format!("{} {} {}", self.make, self.model, self.plate)
    }
}

impl Entity for Vehicle {
    fn id(&self) -> Uuid {
        self.id
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Mechanic,
    Receptionist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub hired_on: NaiveDate,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        hired_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            name: name.into(),
            email: email.into(),
            role,
            hired_on,
        }
    }
}

impl Entity for Employee {
    fn id(&self) -> Uuid {
        self.id
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }
}
