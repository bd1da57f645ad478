//! Scrapes flashscore-style match listings for a configured set of teams and
//! publishes one iCalendar file per team over a static HTTP endpoint, on a
//! cron schedule.

pub mod browser;
pub mod calendar;
pub mod config;
pub mod generator;
pub mod kickoff;
pub mod loader;
pub mod match_parser;
pub mod types;
pub mod web;
