//! Core engine for carpet sweeps: fix two design variables of a constrained
//! optimization problem at swept grid values and re-optimize the remaining
//! free variables at every grid cell.
#![allow(unused)]

pub mod configuration;
pub mod optimize;
pub mod sweep;
