//! Boiler generates boilerplate files from reusable template packages.
//! A package declares parameters, a tree of templates and optional hook
//! scripts; generating a template resolves its parameters, walks its
//! includes and writes the substituted files into a project.

/// Command-line interface module for the Boiler application
pub mod cli;

/// Package configuration handling
/// Supports JSON and YAML formats (boiler.json, boiler.yml, boiler.yaml)
pub mod config;

/// Common constants: directory names, file extensions, hook names
pub mod constants;

/// Error types and handling for the Boiler application
pub mod error;

/// Hook script discovery and execution
/// Handles scripts named:
/// - before / after
/// - before-<template> / after-<template>
/// - before-<file> / after-<file>
/// - <param>-prompt
pub mod hooks;

/// Path conventions of boiler packages
pub mod layout;

/// Logger setup for the binary
pub mod logger;

/// Argument parsing and parameter resolution
pub mod parser;

/// Core generation orchestration
/// Walks template trees and writes the generated files
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Embedded interpreter for hook and parameter scripts
pub mod script;

/// `{{param}}` substitution, replace-rule variations and output path rules
pub mod substitution;
