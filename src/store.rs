use anyhow::bail;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

use crate::timeutil::{hhmm_from_minutes, minutes_from_hhmm};

pub type UserId = i64;
pub type ClassId = i64;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Missing filters to search classes: {}", .0.join(", "))]
    MissingFilters(Vec<&'static str>),
    #[error("Unrecognized time string: {0}")]
    InvalidTime(String),
    #[error("Unrecognized week day: {0}")]
    InvalidWeekDay(String),
    #[error("{0}")]
    Store(&'static str, #[source] anyhow::Error),
}

/// One class row joined with its tutor's user row, flattened. The user
/// columns are selected after the class columns, so `id` is the user's id.
#[derive(Serialize, Deserialize, FromRow, Clone, Debug)]
pub struct ClassWithTutor {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub whatsapp: String,
    pub bio: String,
    pub subject: String,
    pub cost: f64,
    pub user_id: UserId,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScheduleItem {
    pub week_day: i64,
    pub from: String,
    pub to: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewClass {
    pub name: String,
    pub avatar: String,
    pub whatsapp: String,
    pub bio: String,
    pub subject: String,
    pub cost: f64,
    pub schedule: Vec<ScheduleItem>,
}

/// Store client for the classes directory. Owns the connection pool and is
/// placed in rocket managed state by the db fairing; routes only translate
/// between HTTP and the results returned here.
#[derive(Clone)]
pub struct ClassDirectory {
    pool: SqlitePool,
}

impl ClassDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All three filters are required. Matches classes on exact subject
    /// having at least one schedule window covering `time` on `week_day`;
    /// the window's upper bound is exclusive.
    pub async fn search(
        &self,
        subject: Option<&str>,
        week_day: Option<&str>,
        time: Option<&str>,
    ) -> Result<Vec<ClassWithTutor>, DirectoryError> {
        // empty filter values count as absent, same as an omitted parameter
        let subject = subject.filter(|s| !s.trim().is_empty());
        let week_day = week_day.filter(|s| !s.trim().is_empty());
        let time = time.filter(|s| !s.trim().is_empty());
        let mut missing = Vec::new();
        if subject.is_none() { missing.push("subject"); }
        if week_day.is_none() { missing.push("week_day"); }
        if time.is_none() { missing.push("time"); }
        let (Some(subject), Some(week_day), Some(time)) = (subject, week_day, time) else {
            return Err(DirectoryError::MissingFilters(missing));
        };
        let week_day = week_day.trim().parse::<i64>()
            .map_err(|_| DirectoryError::InvalidWeekDay(week_day.to_string()))?;
        let time_in_minutes = minutes_from_hhmm(time)
            .map_err(|_| DirectoryError::InvalidTime(time.to_string()))?;

        let classes = sqlx::query_as::<_, ClassWithTutor>(
            r#"SELECT classes.subject, classes.cost, classes.user_id,
                      users.id, users.name, users.avatar, users.whatsapp, users.bio
               FROM classes
               JOIN users ON users.id = classes.user_id
               WHERE classes.subject = ?
                 AND EXISTS (
                     SELECT 1 FROM class_schedule
                     WHERE class_schedule.class_id = classes.id
                       AND class_schedule.week_day = ?
                       AND class_schedule."from" <= ?
                       AND class_schedule."to" > ?
                 )"#,
        )
        .bind(subject)
        .bind(week_day)
        .bind(time_in_minutes)
        .bind(time_in_minutes)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DirectoryError::Store("Unexpected error while searching classes", e.into()))?;
        Ok(classes)
    }

    /// Creates the tutor, the class and all its schedule windows in one
    /// transaction. Any failure rolls the whole registration back.
    pub async fn register(&self, new_class: &NewClass) -> Result<(), DirectoryError> {
        self.insert_class(new_class)
            .await
            .map_err(|e| DirectoryError::Store("Unexpected error while creating new class", e))
    }

    async fn insert_class(&self, new_class: &NewClass) -> anyhow::Result<()> {
        if new_class.schedule.is_empty() {
            bail!("a class needs at least one schedule window");
        }
        let mut txn = self.pool.begin().await?;
        let (user_id,): (UserId,) = sqlx::query_as(
            "INSERT INTO users(name, avatar, whatsapp, bio) VALUES (?, ?, ?, ?) RETURNING id")
            .bind(&new_class.name)
            .bind(&new_class.avatar)
            .bind(&new_class.whatsapp)
            .bind(&new_class.bio)
            .fetch_one(&mut *txn)
            .await?;
        let (class_id,): (ClassId,) = sqlx::query_as(
            "INSERT INTO classes(subject, cost, user_id) VALUES (?, ?, ?) RETURNING id")
            .bind(&new_class.subject)
            .bind(new_class.cost)
            .bind(user_id)
            .fetch_one(&mut *txn)
            .await?;
        for item in &new_class.schedule {
            let from = minutes_from_hhmm(&item.from)?;
            let to = minutes_from_hhmm(&item.to)?;
            sqlx::query(
                r#"INSERT INTO class_schedule(class_id, week_day, "from", "to") VALUES (?, ?, ?, ?)"#)
                .bind(class_id)
                .bind(item.week_day)
                .bind(from)
                .bind(to)
                .execute(&mut *txn)
                .await?;
            debug!("Class {class_id}: window day {} {}-{}",
                item.week_day, hhmm_from_minutes(from), hhmm_from_minutes(to));
        }
        txn.commit().await?;
        info!("Class registered, id: {class_id}, subject: {}, tutor: {user_id}", new_class.subject);
        Ok(())
    }
}
