// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Toolkit-independent user interface layer
//!
//! # Architecture
//!
//! - **Model**: AssignmentEngine, TreeProjection, SettingsStore (in `core` and `config`)
//! - **View**: supplied by the embedding application (widgets, dialogs, keyboard)
//! - **Controller**: Mediates between Model and View (in `controller.rs`)

pub mod controller;

pub use controller::{Controller, ControllerError, TreeRow};

#[cfg(test)]
mod tests;
