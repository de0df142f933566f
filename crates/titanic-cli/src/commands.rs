use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use titanic_model::Projection;
use titanic_store::{PassengerStore, StoreError};
use tracing::info_span;

use titanic_cli::http;
use titanic_cli::render::{histogram_table, passenger_table, passengers_table};

use crate::cli::{OutputArgs, ServeArgs};

pub fn run_serve(store: Arc<dyn PassengerStore>, args: &ServeArgs) -> Result<()> {
    let addr = SocketAddr::new(args.host, args.port);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(http::serve(store, addr))
}

pub fn run_list(store: &dyn PassengerStore, output: &OutputArgs) -> Result<()> {
    let _guard = info_span!("list", backend = %store.backend()).entered();
    let passengers = store.list().context("list passengers")?;
    if output.json {
        print_json(&passengers)
    } else {
        println!("{}", passengers_table(&passengers));
        Ok(())
    }
}

pub fn run_get(store: &dyn PassengerStore, id: i64, output: &OutputArgs) -> Result<()> {
    let _guard = info_span!("get", backend = %store.backend(), id).entered();
    let passenger = store
        .get(id)
        .with_context(|| format!("get passenger {id}"))?;
    if output.json {
        print_json(&passenger)
    } else {
        println!("{}", passenger_table(&passenger, &Projection::all()));
        Ok(())
    }
}

pub fn run_attributes(
    store: &dyn PassengerStore,
    id: i64,
    names: &[String],
    output: &OutputArgs,
) -> Result<()> {
    let _guard = info_span!("attributes", backend = %store.backend(), id).entered();
    let projection = Projection::parse(names).map_err(StoreError::from)?;
    let passenger = store
        .project(id, &projection)
        .with_context(|| format!("get attributes of passenger {id}"))?;
    if output.json {
        print_json(&passenger)
    } else {
        println!("{}", passenger_table(&passenger, &projection));
        Ok(())
    }
}

pub fn run_histogram(store: &dyn PassengerStore, output: &OutputArgs) -> Result<()> {
    let _guard = info_span!("histogram", backend = %store.backend()).entered();
    let histogram = store.fare_histogram().context("compute fare histogram")?;
    if output.json {
        print_json(&histogram)
    } else {
        println!("{}", histogram_table(&histogram));
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}
