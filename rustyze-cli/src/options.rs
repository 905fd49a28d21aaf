use crate::{
    dispatch_run,
    modules::{user::User, vehicle::Vehicle},
};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "rustyze-cli")]
pub enum Command {
    /// Queries over the vehicle collection.
    Vehicle(Vehicle),
    /// Queries scoped to one user.
    User(User),
}

dispatch_run!(Command { Vehicle, User });
