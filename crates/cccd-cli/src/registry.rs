//! `cccd registry`: business-registry lookups.
//!
//! The registry client is async; each invocation runs on a fresh tokio
//! runtime.

use std::path::Path;

use anyhow::{Context, Result};
use cccd_registry_client::{CompanyQuery, RegistryClient};
use clap::{Args, Subcommand};

use crate::output::emit;

#[derive(Args, Debug)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommand {
    /// List provinces and municipalities.
    Cities,
    /// One city by registry ID.
    City { id: i64 },
    /// Districts of a city.
    Districts { city_id: i64 },
    /// Wards of a district.
    Wards { district_id: i64 },
    /// Industry classification list.
    Industries,
    /// Company by tax code.
    Company { tax_code: String },
    /// Search companies.
    Search {
        /// Free-text keyword.
        #[arg(long)]
        keyword: Option<String>,
        /// Location slug.
        #[arg(long)]
        location: Option<String>,
        /// Industry slug.
        #[arg(long)]
        industry: Option<String>,
        /// Page number (1-based).
        #[arg(long)]
        page: Option<u32>,
        /// Results per page.
        #[arg(long)]
        per_page: Option<u32>,
        /// Follow pagination until exhausted.
        #[arg(long)]
        all: bool,
    },
}

pub fn run_registry(args: &RegistryArgs, output: Option<&Path>) -> Result<u8> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(dispatch(&args.command, output))
}

async fn dispatch(command: &RegistryCommand, output: Option<&Path>) -> Result<u8> {
    let client = RegistryClient::from_env()?;
    match command {
        RegistryCommand::Cities => emit(&client.cities().await?, output)?,
        RegistryCommand::City { id } => return found(client.city_detail(*id).await?, output),
        RegistryCommand::Districts { city_id } => {
            emit(&client.districts(*city_id).await?, output)?
        }
        RegistryCommand::Wards { district_id } => {
            emit(&client.wards(*district_id).await?, output)?
        }
        RegistryCommand::Industries => emit(&client.industries().await?, output)?,
        RegistryCommand::Company { tax_code } => {
            return found(client.company_by_tax_code(tax_code).await?, output)
        }
        RegistryCommand::Search {
            keyword,
            location,
            industry,
            page,
            per_page,
            all,
        } => {
            let query = CompanyQuery {
                keyword: keyword.clone(),
                location: location.clone(),
                industry: industry.clone(),
                per_page: *per_page,
                page: *page,
            };
            if *all {
                emit(&client.all_companies(query).await?, output)?;
            } else {
                emit(&client.search_companies(&query).await?, output)?;
            }
        }
    }
    Ok(0)
}

fn found<T: serde::Serialize>(item: Option<T>, output: Option<&Path>) -> Result<u8> {
    emit(&item, output)?;
    Ok(if item.is_some() { 0 } else { 1 })
}
