// SPDX-FileCopyrightText: 2026 Pipekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline requests and their normalisation.
//!
//! A build request is a list of [`Reference`]s. Normalisation flattens one
//! level of nesting, peels off trailing options, and decides whether the
//! caller named any plugins at all.

use pipekit_core::{Factory, Options, Unit};

/// One argument of a pipeline request.
#[derive(Clone, Debug)]
pub enum Reference {
    /// A plugin name, looked up in the registry.
    Name(String),
    /// An unregistered factory, invoked with the build options.
    Factory(Factory),
    /// A ready-made stage.
    Unit(Unit),
    /// A nested group of references, flattened one level.
    Many(Vec<Reference>),
    /// Build options; only meaningful in trailing position.
    Options(Options),
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Name(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Name(name)
    }
}

impl From<Factory> for Reference {
    fn from(factory: Factory) -> Self {
        Reference::Factory(factory)
    }
}

impl From<Unit> for Reference {
    fn from(unit: Unit) -> Self {
        Reference::Unit(unit)
    }
}

impl From<Options> for Reference {
    fn from(options: Options) -> Self {
        Reference::Options(options)
    }
}

impl<T: Into<Reference>> From<Vec<T>> for Reference {
    fn from(items: Vec<T>) -> Self {
        Reference::Many(items.into_iter().map(Into::into).collect())
    }
}

/// A normalised request.
#[derive(Debug)]
pub enum Request {
    /// The request was a single ready-made stage; return it as is.
    Prebuilt(Unit),
    /// References to resolve with shared build options.
    Plan(Plan),
}

/// References and options for one build.
#[derive(Debug, Default)]
pub struct Plan {
    /// `None` when the caller named nothing, meaning every registered plugin.
    pub references: Option<Vec<Reference>>,
    pub options: Options,
}

/// Normalise the arguments of a build call.
pub fn normalize(args: Vec<Reference>) -> Request {
    if let [Reference::Unit(unit)] = args.as_slice() {
        return Request::Prebuilt(unit.clone());
    }

    let specified = args.iter().any(|arg| !matches!(arg, Reference::Options(_)));

    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Reference::Many(items) => flat.extend(items),
            other => flat.push(other),
        }
    }

    let trailing = match flat.pop() {
        Some(Reference::Options(options)) => options,
        Some(other) => {
            flat.push(other);
            Options::new()
        }
        None => Options::new(),
    };

    if !specified {
        // Only option objects were passed: fold them, later ones winning.
        let mut options = Options::new();
        for arg in flat {
            if let Reference::Options(earlier) = arg {
                options.extend(earlier);
            }
        }
        options.extend(trailing);
        return Request::Plan(Plan {
            references: None,
            options,
        });
    }

    Request::Plan(Plan {
        references: Some(flat),
        options: trailing,
    })
}
