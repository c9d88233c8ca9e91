//! YAML-driven SNMP polling agent.
//!
//! The agent reads a per-agent YAML configuration file describing
//! `auth_groups` (SNMP credentials applied to target addresses) and
//! `polling_groups` (OID lists applied to target addresses), validates
//! the loose document into typed polling descriptors, and polls every
//! configured OID on every target at the configured interval.

pub mod config;
pub mod poller;
pub mod secret;
pub mod snmp;
