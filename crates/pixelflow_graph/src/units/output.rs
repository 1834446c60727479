// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output: the sink that captures the final image.

use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// Sink node keeping a copy of whatever reaches its input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Output {
    #[serde(skip)]
    received: Option<Image>,
}

impl Output {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
    }

    /// Image captured by the last run
    pub fn received(&self) -> Option<&Image> {
        self.received.as_ref()
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        self.received = ctx.input(0);
    }
}
