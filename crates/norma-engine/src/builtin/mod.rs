//! # Built-in Handlers
//!
//! Installed into every engine created with [`crate::Engine::new`].
//!
//! | kind      | names |
//! |-----------|-------|
//! | type      | `number`, `string`, `boolean`, `date`, `integer`, `function`, `object`, `array` |
//! | check     | `min`, `max`, `min_length`, `max_length`, `set`, `unique` |
//! | transform | `trim`, `lowercase`, `uppercase`, `round`, `floor`, `ceil`, `iso_datetime` |

pub mod checks;
pub mod transforms;
pub mod types;

use crate::registry::Registries;

/// Register every built-in handler.
pub fn install(registries: &mut Registries) {
    types::install(&mut registries.types);
    checks::install(&mut registries.checks);
    transforms::install(&mut registries.transforms);
}
