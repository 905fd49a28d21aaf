use structopt::StructOpt;

use rustyze::{
    common::Client,
    meter,
    modules::{firestore::Database, vehicles},
    schemas::vehicle::ScoredVehicle,
};

use crate::common::Run;

#[derive(StructOpt)]
pub struct User {
    /// Firestore project backing the vehicle store.
    #[structopt(long, env = "RUSTYZE_PROJECT", default_value = "rustyze")]
    project: String,
    /// The user's uid. Passed explicitly - there is no ambient session.
    uid: String,
    #[structopt(subcommand)]
    action: Action,
}

#[derive(StructOpt)]
enum Action {
    /// The user's most recently seen vehicles with their rustyMeter,
    /// oldest first.
    SeenRecently {
        #[structopt(long, default_value = "3")]
        limit: usize,
    },
}

#[async_trait::async_trait]
impl Run for User {
    async fn run(&self, out: &mut (dyn erased_serde::Serializer + Send)) -> anyhow::Result<()> {
        let client = Client::default();
        let db = Database::new(&self.project);

        match &self.action {
            Action::SeenRecently { limit } => {
                let vehicles = vehicles::seen_recently(&client, &db, &self.uid).await?;
                let scored: Vec<ScoredVehicle> = vehicles
                    .into_iter()
                    .map(|vehicle| {
                        let rusty_meter = vehicle.rusty_meter();
                        ScoredVehicle {
                            id: vehicle.id,
                            rusty_meter,
                        }
                    })
                    .collect();
                erased_serde::serialize(&meter::top_recent(&scored, *limit), out)?;
            }
        }

        Ok(())
    }
}
