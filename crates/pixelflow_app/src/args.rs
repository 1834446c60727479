// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command line arguments.

use clap::Parser;
use pixelflow_graph::Image;
use std::path::PathBuf;
use std::str::FromStr;

/// Evaluate a pixelflow graph recipe
#[derive(Debug, Parser)]
#[command(name = "pixelflow", version, about = "Evaluate a pixelflow graph recipe")]
pub struct Cli {
    /// Graph recipe (RON)
    pub recipe: PathBuf,

    /// Engine config (RON). A missing file means defaults.
    #[arg(long, default_value = "engine.ron")]
    pub config: PathBuf,

    /// Fill an image input node with a solid color.
    ///
    /// Format: `<node-index>=<W>x<H>:<r>,<g>,<b>[,<a>]`, where the node index
    /// is the node's position in the recipe.
    #[arg(long = "input", value_name = "SPEC")]
    pub inputs: Vec<InputSpec>,
}

/// A solid-color image for one input node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    /// Node position in the recipe
    pub node: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Fill color
    pub rgba: [u8; 4],
}

impl InputSpec {
    /// Build the image this spec describes
    pub fn image(&self) -> Image {
        Image::solid(self.width, self.height, self.rgba)
    }
}

/// Malformed `--input` value
#[derive(Debug, thiserror::Error)]
#[error("invalid input '{spec}': {reason}")]
pub struct InputSpecError {
    spec: String,
    reason: &'static str,
}

impl FromStr for InputSpec {
    type Err = InputSpecError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let fail = |reason| InputSpecError {
            spec: spec.to_string(),
            reason,
        };

        let (node, rest) = spec.split_once('=').ok_or_else(|| fail("expected <node-index>=..."))?;
        let node = node.trim().parse().map_err(|_| fail("node index is not a number"))?;

        let (size, color) = rest.split_once(':').ok_or_else(|| fail("expected <W>x<H>:<color>"))?;
        let (width, height) = size.split_once('x').ok_or_else(|| fail("size must be <W>x<H>"))?;
        let width: u32 = width.trim().parse().map_err(|_| fail("width is not a number"))?;
        let height: u32 = height.trim().parse().map_err(|_| fail("height is not a number"))?;
        if width == 0 || height == 0 {
            return Err(fail("size must be non-zero"));
        }

        let channels = color
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| fail("color channels must be 0-255"))?;
        let rgba = match channels[..] {
            [r, g, b] => [r, g, b, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => return Err(fail("color needs 3 or 4 channels")),
        };

        Ok(Self {
            node,
            width,
            height,
            rgba,
        })
    }
}
