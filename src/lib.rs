#[allow(non_snake_case)]
pub mod Calculations;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Sweep;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod settings;
