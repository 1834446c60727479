// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image input: a source node holding an image supplied by the host.

use crate::artifact::{Artifact, Image};
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

/// Source node publishing a host-supplied image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInput {
    /// Image to publish; loading it is the host's job
    #[serde(skip)]
    image: Option<Image>,
}

impl ImageInput {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_output_pin("Image", PinType::Image);
    }

    /// Replace the published image
    pub fn set_image(&mut self, image: Option<Image>) {
        self.image = image;
    }

    /// Currently held image
    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// `(width, height)` of the held image
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|i| (i.width(), i.height()))
    }

    /// Size of the held image in bytes
    pub fn size_bytes(&self) -> usize {
        self.image.as_ref().map_or(0, Artifact::byte_size)
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        ctx.set_output(0, self.image.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_image_info() {
        let mut input = ImageInput::default();
        assert_eq!(input.dimensions(), None);
        assert_eq!(input.size_bytes(), 0);

        input.set_image(Some(Image::solid(3, 2, [1, 2, 3, 4])));
        assert_eq!(input.dimensions(), Some((3, 2)));
        assert_eq!(input.size_bytes(), 24);
        assert_eq!(input.image().and_then(|i| i.pixel(2, 1)), Some([1, 2, 3, 4]));
    }
}
