use crate::model::Id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrantStatus {
    Active,
    Completed,
    Pending,
}

/// A research funding grant from an external agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: Id,
    pub title: String,
    pub principal_investigator: String,
    pub agency: String,
    /// Sanctioned amount in rupees.
    pub amount: f64,
    pub status: GrantStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: String,
    /// Budget utilization percentage, reported by the grant office.
    pub utilization: u8,
    pub research_area: String,
}
