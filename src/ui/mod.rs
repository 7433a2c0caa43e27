//! Terminal UI for the policy assistant.
//!
//! - [`chat_loop`]: terminal lifecycle, key handling and the event loop that
//!   feeds actions into [`crate::core::app`] and runs backend commands.
//! - [`renderer`] composes one frame from the panes in [`sidebar`], [`header`],
//!   [`chat_display`], [`input_section`] and [`notification`].
//! - [`layout`] and [`markdown`] turn messages into wrapped, styled lines.
//! - [`theme`] holds the light and dark palettes.

pub mod chat_display;
pub mod chat_loop;
pub mod header;
pub mod input_section;
pub mod layout;
pub mod markdown;
pub mod notification;
pub mod renderer;
pub mod sidebar;
pub mod theme;
