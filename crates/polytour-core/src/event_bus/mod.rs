//! # Event Bus Module
//!
//! Provides a unified event bus system for decoupled communication between
//! the event bridge, the tour, and any other interested observer.
//!
//! ## Overview
//!
//! The event bus enables publish/subscribe patterns across the application:
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Supports both sync and async event handling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polytour_core::event_bus::{event_bus, EditorEvent, EventCategory, EventFilter};
//!
//! // Subscribe to tool events; the guard unsubscribes on drop
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Tool]),
//!     |event| {
//!         if let EditorEvent::Tool(tool) = event {
//!             println!("Tool event: {:?}", tool);
//!         }
//!     },
//! );
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
