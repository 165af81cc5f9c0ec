//! # ticktree - Sampling Profiler Call Trees
//!
//! ticktree is the data model at the center of an in-process sampling
//! profiler: what a unit of executed code is, how sampled call paths become
//! nodes of a per-context call tree, and how each node is labeled for
//! reporting.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Code-Event Source                           │
//! │        (code created / moved / deleted, stacks sampled)         │
//! └───────────────┬─────────────────────────────┬───────────────────┘
//!                 │ CodeIdentity                │ TickSample
//!                 ▼                             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ticktree (This Crate)                       │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │     Code     │──▶│     Tree     │──▶│Classification│         │
//! │  │  (identity)  │   │ (ProfileTree)│   │ (SourceType) │         │
//! │  └──────────────┘   └──────────────┘   └──────────────┘         │
//! │                            ▲                   │                │
//! │                            │                   ▼                │
//! │                     ┌──────────────┐   ┌──────────────┐         │
//! │                     │  Profiling   │   │   Analysis   │         │
//! │                     │ (collector)  │   │  (summary)   │         │
//! │                     └──────────────┘   └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`code`]: `CodeIdentity`, packed `CodeFlags`, `SourcePositionTable`, and
//!   the five synthetic singletons (`program_entry()` and friends)
//! - [`tree`]: `ProfileNode`, the `NodeTree` contract, and `ProfileTree`
//! - [`classification`]: node → `SourceType` labeling
//! - [`profiling`]: the single-threaded sample collector and console rendering
//! - [`analysis`]: self time per source type, hottest nodes
//! - [`trace_data`]: recorded sample traces (JSON input)
//! - [`cli`]: command-line arguments
//! - [`domain`]: newtypes (`NodeId`, `NodeIndex`, `ContextId`) and errors
//!
//! ## Key Concepts
//!
//! - **Code identity**: one observed unit of code and its reporting metadata
//! - **Synthetic entry**: process-wide identity for non-user time, compared
//!   by reference
//! - **Self ticks**: samples whose leaf frame resolved exactly to a node
//! - **Source type**: Internal, Unresolved, Script, Builtin or Callback

pub mod analysis;
pub mod classification;
pub mod cli;
pub mod code;
pub mod domain;
pub mod profiling;
pub mod trace_data;
pub mod tree;
