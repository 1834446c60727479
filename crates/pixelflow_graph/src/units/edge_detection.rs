// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge detection on luma: Sobel, Canny or Laplacian.

use super::kernel::{saturate, Kernel};
use crate::artifact::Image;
use crate::evaluation::ProcessContext;
use crate::node::NodeBuilder;
use crate::pin::PinType;
use serde::{Deserialize, Serialize};

const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];
const LAPLACIAN: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

/// Edge operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeMethod {
    /// First derivative, averaged over the enabled axes
    #[default]
    Sobel,
    /// Thin edges with hysteresis
    Canny,
    /// Second derivative
    Laplacian,
}

/// Edge detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeDetection {
    /// Operator
    pub method: EdgeMethod,
    /// Sobel: use the x derivative
    pub sobel_dx: bool,
    /// Sobel: use the y derivative
    pub sobel_dy: bool,
    /// Canny: weak edge threshold
    pub canny_low: f32,
    /// Canny: strong edge threshold
    pub canny_high: f32,
    /// Canny: Euclidean gradient magnitude instead of `|dx| + |dy|`
    pub l2_gradient: bool,
    /// Laplacian: response gain
    pub laplacian_scale: f32,
    /// Laplacian: offset added before taking the absolute value
    pub laplacian_delta: f32,
}

impl Default for EdgeDetection {
    fn default() -> Self {
        Self {
            method: EdgeMethod::Sobel,
            sobel_dx: true,
            sobel_dy: true,
            canny_low: 100.0,
            canny_high: 200.0,
            l2_gradient: false,
            laplacian_scale: 1.0,
            laplacian_delta: 0.0,
        }
    }
}

impl EdgeDetection {
    pub(crate) fn declare_pins(builder: &mut NodeBuilder) {
        builder.add_input_pin("Image", PinType::Image);
        builder.add_output_pin("Image", PinType::Image);
    }

    /// Detect edges in `image`. The result is an opaque gray image.
    pub fn apply(&self, image: &Image) -> Image {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let plane: Vec<f32> = image.to_luma().into_iter().map(f32::from).collect();
        let edges = match self.method {
            EdgeMethod::Sobel => self.sobel(&plane, w, h),
            EdgeMethod::Canny => self.canny(&plane, w, h),
            EdgeMethod::Laplacian => Kernel::square3(LAPLACIAN)
                .apply_plane(&plane, w, h)
                .into_iter()
                .map(|v| saturate((v * self.laplacian_scale + self.laplacian_delta).abs()))
                .collect(),
        };
        Image::from_luma(image.width(), image.height(), &edges)
    }

    fn sobel(&self, plane: &[f32], w: usize, h: usize) -> Vec<u8> {
        // at least one axis is always on
        let dx = self.sobel_dx || !self.sobel_dy;
        let axis = |on: bool, weights| -> Vec<f32> {
            if on {
                Kernel::square3(weights)
                    .apply_plane(plane, w, h)
                    .into_iter()
                    .map(|v| f32::from(saturate(v.abs())))
                    .collect()
            } else {
                vec![0.0; plane.len()]
            }
        };
        let gx = axis(dx, SOBEL_X);
        let gy = axis(self.sobel_dy, SOBEL_Y);
        gx.iter().zip(&gy).map(|(x, y)| saturate(0.5 * x + 0.5 * y)).collect()
    }

    fn canny(&self, plane: &[f32], w: usize, h: usize) -> Vec<u8> {
        let (low, high) = if self.canny_low <= self.canny_high {
            (self.canny_low, self.canny_high)
        } else {
            (self.canny_high, self.canny_low)
        };
        let gx = Kernel::square3(SOBEL_X).apply_plane(plane, w, h);
        let gy = Kernel::square3(SOBEL_Y).apply_plane(plane, w, h);
        let magnitude: Vec<f32> = gx
            .iter()
            .zip(&gy)
            .map(|(x, y)| if self.l2_gradient { x.hypot(*y) } else { x.abs() + y.abs() })
            .collect();

        let at = |x: isize, y: isize| -> f32 {
            if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
                0.0
            } else {
                magnitude[y as usize * w + x as usize]
            }
        };

        // 0 = suppressed, 1 = weak, 2 = strong
        let mut class = vec![0u8; plane.len()];
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let m = magnitude[i];
                if m <= low {
                    continue;
                }
                let (ox, oy) = gradient_step(gx[i], gy[i]);
                let (xi, yi) = (x as isize, y as isize);
                if m < at(xi + ox, yi + oy) || m < at(xi - ox, yi - oy) {
                    continue;
                }
                class[i] = if m > high { 2 } else { 1 };
            }
        }

        let mut out = vec![0u8; plane.len()];
        let mut stack: Vec<usize> = (0..class.len()).filter(|&i| class[i] == 2).collect();
        while let Some(i) = stack.pop() {
            if out[i] == 255 {
                continue;
            }
            out[i] = 255;
            let (x, y) = ((i % w) as isize, (i / w) as isize);
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                        continue;
                    }
                    let j = ny as usize * w + nx as usize;
                    if class[j] > 0 && out[j] == 0 {
                        stack.push(j);
                    }
                }
            }
        }
        out
    }

    pub(crate) fn process(&mut self, ctx: &mut ProcessContext<'_>) {
        let out = ctx.input(0).map(|img| self.apply(&img));
        ctx.set_output(0, out);
    }
}

/// Neighbour offset along the gradient, quantised to 45 degrees
fn gradient_step(gx: f32, gy: f32) -> (isize, isize) {
    let angle = gy.atan2(gx).to_degrees().rem_euclid(180.0);
    if !(22.5..157.5).contains(&angle) {
        (1, 0)
    } else if angle < 67.5 {
        (1, 1)
    } else if angle < 112.5 {
        (0, 1)
    } else {
        (-1, 1)
    }
}
