use anyhow::Context;
use structopt::StructOpt;

use rustyze::{
    common::Client,
    meter,
    modules::{firestore::Database, vehicles},
    schemas::vehicle::VehicleId,
};

use crate::common::Run;

#[derive(StructOpt)]
pub struct Vehicle {
    /// Firestore project backing the vehicle store.
    #[structopt(long, env = "RUSTYZE_PROJECT", default_value = "rustyze")]
    project: String,
    #[structopt(subcommand)]
    action: Action,
}

#[derive(StructOpt)]
enum Action {
    /// Dump one vehicle's record.
    Json { id: String },
    /// Compute one vehicle's rustyMeter percentage.
    Meter { id: String },
    /// Rank all vehicles by rustyMeter, best first.
    Top {
        #[structopt(long, default_value = "10")]
        limit: usize,
    },
}

#[async_trait::async_trait]
impl Run for Vehicle {
    async fn run(&self, out: &mut (dyn erased_serde::Serializer + Send)) -> anyhow::Result<()> {
        let client = Client::default();
        let db = Database::new(&self.project);

        match &self.action {
            Action::Json { id } => {
                let vehicle = vehicles::by_id(&client, &db, &VehicleId::from(id.as_str()))
                    .await?
                    .with_context(|| format!("no such vehicle: {}", id))?;
                erased_serde::serialize(&vehicle, out)?;
            }
            Action::Meter { id } => {
                let vehicle = vehicles::by_id(&client, &db, &VehicleId::from(id.as_str()))
                    .await?
                    .with_context(|| format!("no such vehicle: {}", id))?;
                erased_serde::serialize(&vehicle.rusty_meter(), out)?;
            }
            Action::Top { limit } => {
                let mut ranked = meter::rank(vehicles::all(&client, &db).await?);
                ranked.truncate(*limit);
                erased_serde::serialize(&ranked, out)?;
            }
        }

        Ok(())
    }
}
