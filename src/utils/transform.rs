//! Perspective transformation and image warping.
//!
//! This module maps a detected receipt quadrilateral onto an axis-aligned
//! rectangle. The transform matrix is obtained by solving the standard 8x8
//! linear system for a planar homography; warping uses inverse mapping with
//! bilinear interpolation, parallelized per output row.

use crate::core::RectifyError;
use crate::processors::geometry::{Point, order_quad};
use image::{Rgb, RgbImage};
use nalgebra::{Matrix3, Vector3};
use rayon::prelude::*;

/// Unwarps the quadrilateral region of `src_image` described by `quad` into
/// an axis-aligned rectangular image.
///
/// The four points may be in any order; they are canonically ordered first.
/// The destination width is the longer of the top and bottom edges, the
/// destination height the longer of the left and right edges, each clamped to
/// at least one pixel so degenerate quads still produce an image.
///
/// # Errors
///
/// Returns [`RectifyError::InvalidInput`] if the perspective system cannot be
/// solved (collinear or coincident corners). Callers in the pipeline treat
/// this as a signal to fall back to the unrectified image.
pub fn four_point_unwarp(src_image: &RgbImage, quad: [Point; 4]) -> Result<RgbImage, RectifyError> {
    let [tl, tr, br, bl] = order_quad(quad);

    let width_bottom = br.distance(&bl);
    let width_top = tr.distance(&tl);
    let dst_width = (width_bottom.max(width_top) as u32).max(1);

    let height_right = tr.distance(&br);
    let height_left = tl.distance(&bl);
    let dst_height = (height_right.max(height_left) as u32).max(1);

    let src_points = [tl, tr, br, bl];
    let dst_points = [
        Point::new(0.0, 0.0),
        Point::new(dst_width as f32 - 1.0, 0.0),
        Point::new(dst_width as f32 - 1.0, dst_height as f32 - 1.0),
        Point::new(0.0, dst_height as f32 - 1.0),
    ];

    let matrix = perspective_transform(&src_points, &dst_points)?;
    warp_perspective(src_image, &matrix, dst_width, dst_height)
}

/// Calculates the perspective transformation matrix mapping four source
/// points to four destination points.
///
/// # Errors
///
/// Returns [`RectifyError::InvalidInput`] if the linear system cannot be
/// solved.
pub fn perspective_transform(
    src_points: &[Point; 4],
    dst_points: &[Point; 4],
) -> Result<Matrix3<f32>, RectifyError> {
    // Set up the 8x8 linear system for the homography coefficients
    let mut a = nalgebra::DMatrix::<f32>::zeros(8, 8);
    let mut b = nalgebra::DVector::<f32>::zeros(8);

    for i in 0..4 {
        let src = &src_points[i];
        let dst = &dst_points[i];

        // Equation for the x coordinate
        a.set_row(
            i * 2,
            &nalgebra::RowDVector::from_row_slice(&[
                src.x,
                src.y,
                1.0,
                0.0,
                0.0,
                0.0,
                -src.x * dst.x,
                -src.y * dst.x,
            ]),
        );
        b[i * 2] = dst.x;

        // Equation for the y coordinate
        a.set_row(
            i * 2 + 1,
            &nalgebra::RowDVector::from_row_slice(&[
                0.0,
                0.0,
                0.0,
                src.x,
                src.y,
                1.0,
                -src.x * dst.y,
                -src.y * dst.y,
            ]),
        );
        b[i * 2 + 1] = dst.y;
    }

    let decomp = a.lu();
    let solution = decomp.solve(&b).ok_or_else(|| {
        RectifyError::invalid_input("cannot solve perspective transformation")
    })?;

    Ok(Matrix3::new(
        solution[0],
        solution[1],
        solution[2],
        solution[3],
        solution[4],
        solution[5],
        solution[6],
        solution[7],
        1.0,
    ))
}

/// Applies a perspective transformation to an image.
///
/// Uses inverse mapping with bilinear interpolation; destination pixels whose
/// source falls outside the image stay black.
///
/// # Errors
///
/// Returns [`RectifyError::InvalidInput`] if the transformation matrix cannot
/// be inverted.
pub fn warp_perspective(
    src_image: &RgbImage,
    transform_matrix: &Matrix3<f32>,
    dst_width: u32,
    dst_height: u32,
) -> Result<RgbImage, RectifyError> {
    let inv_matrix = transform_matrix
        .try_inverse()
        .ok_or_else(|| RectifyError::invalid_input("cannot invert transformation matrix"))?;

    let mut dst_image = RgbImage::new(dst_width, dst_height);
    let (src_width, src_height) = src_image.dimensions();
    let buffer: &mut [u8] = dst_image.as_mut();

    // Each output row is independent; map rows in parallel
    buffer
        .par_chunks_mut((dst_width * 3) as usize)
        .enumerate()
        .for_each(|(dst_y, row_buffer)| {
            for dst_x in 0..dst_width {
                let dst_point = Vector3::new(dst_x as f32, dst_y as f32, 1.0);
                let src_point = inv_matrix * dst_point;

                let mut final_pixel = Rgb([0, 0, 0]);

                if src_point.z.abs() > f32::EPSILON {
                    let src_x = src_point.x / src_point.z;
                    let src_y = src_point.y / src_point.z;

                    if src_x >= 0.0
                        && src_y >= 0.0
                        && src_x < (src_width - 1) as f32
                        && src_y < (src_height - 1) as f32
                    {
                        final_pixel = bilinear_interpolate(src_image, src_x, src_y);
                    }
                }

                let index = (dst_x * 3) as usize;
                row_buffer[index..index + 3].copy_from_slice(&final_pixel.0);
            }
        });

    Ok(dst_image)
}

/// Performs bilinear interpolation to get a pixel value at non-integer
/// coordinates.
fn bilinear_interpolate(image: &RgbImage, x: f32, y: f32) -> Rgb<u8> {
    let x1 = x.floor() as u32;
    let y1 = y.floor() as u32;
    let x2 = (x1 + 1).min(image.width() - 1);
    let y2 = (y1 + 1).min(image.height() - 1);

    let dx = x - x1 as f32;
    let dy = y - y1 as f32;

    let p11 = image.get_pixel(x1, y1);
    let p12 = image.get_pixel(x1, y2);
    let p21 = image.get_pixel(x2, y1);
    let p22 = image.get_pixel(x2, y2);

    let mut result = [0u8; 3];
    for (i, result_channel) in result.iter_mut().enumerate() {
        let val = (1.0 - dx) * (1.0 - dy) * p11.0[i] as f32
            + dx * (1.0 - dy) * p21.0[i] as f32
            + (1.0 - dx) * dy * p12.0[i] as f32
            + dx * dy * p22.0[i] as f32;
        *result_channel = val.round().clamp(0.0, 255.0) as u8;
    }

    Rgb(result)
}
