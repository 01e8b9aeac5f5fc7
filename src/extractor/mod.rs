//! Message rendering and transcript assembly.
//!
//! # Module Structure
//!
//! - `tags`: Tag constants and helper functions
//! - `state`: Per-run render state (image de-dup set)
//! - `images`: Image resolution and generated-image containers
//! - `handlers`: Element handlers for formatting, code, lists, artifacts and math
//! - `node`: Recursive node renderer with per-node error isolation
//! - `pipeline`: Block rendering and transcript assembly
//!
//! # Usage
//!
//! ```rust,ignore
//! use ai_chat_export::extractor::{pipeline, RenderContext};
//!
//! let mut ctx = RenderContext::new(&profile, options.max_depth);
//! let assembled = pipeline::assemble(&discovery, &classifier, &mut ctx);
//!
//! // Or render a single node:
//! let markdown = render_node(&node, &mut ctx, 0);
//! ```

pub mod handlers;
pub mod images;
pub mod node;
pub mod pipeline;
pub mod state;
pub mod tags;

pub use node::{render_children, render_node};
pub use pipeline::{assemble, render_block, Assembled};
pub use state::RenderContext;
