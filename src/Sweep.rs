//! # Sweep Module
//!
//! ## Purpose
//! Turns a closed-form model into tables and figures: the model is evaluated at every
//! combination of a set of named axes, the results are collected into a [`table::Table`],
//! written once as CSV and rendered once as PNG.
//!
//! ## Main Structures
//! - [`axis::Column`] - name + unit, the CSV header is `name [unit]`
//! - [`axis::Axis`] - strictly increasing values of one swept quantity
//! - [`sweep_pipeline::SweepPipeline`] - cross product evaluation
//! - [`table::Table`] - immutable result with grouping by series keys and filtering
//! - [`plot::FigureSpec`] - what to draw from a table
//!
//! ## Row order
//! | Axis position | Varies |
//! |---------------|--------|
//! | first declared | slowest |
//! | last declared | fastest |
//!
//! Grouping keeps the declaration order of the key axes, so curves and legend entries come
//! out in the order the values were listed in the settings.

/// Named, ordered sweep dimensions
pub mod axis;
/// CSV persistence of a table
pub mod csv_output;
/// PNG rendering with plotters
pub mod plot;
/// Cross product evaluation of a model over axes
pub mod sweep_pipeline;
/// Result table, grouping and filtering
pub mod table;

mod sweep_tests;
