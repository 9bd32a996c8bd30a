//! PNG rendering of cluster labelings, one random color per cluster.

use anyhow::{anyhow, Context, Result};
use percolate::Clustering;
use rand::Rng;
use rand_pcg::Pcg32;
use std::path::Path;

const PALETTE_STREAM: u64 = 0x5eed_c0105;

/// Draw one uniformly random RGB color per cluster.
pub fn random_palette(num_clusters: u32, seed: u64) -> Vec<[u8; 3]> {
    let mut rng = Pcg32::new(seed, PALETTE_STREAM);
    (0..num_clusters).map(|_| rng.gen()).collect()
}

/// Width in pixels of a square image with `scale` x `scale` pixels per site,
/// and the byte length of its RGB buffer.
fn image_dims(side: usize, scale: usize) -> Result<(usize, usize)> {
    let img_size = side
        .checked_mul(scale)
        .ok_or_else(|| anyhow!("{side} sites at scale {scale} overflow the image width"))?;
    let len = img_size
        .checked_mul(img_size)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow!("a {img_size}x{img_size} RGB image is too large"))?;
    Ok((img_size, len))
}

/// Paint each site with its cluster's color, `scale` x `scale` pixels per site.
pub fn clustering_to_rgb(
    clustering: &Clustering,
    palette: &[[u8; 3]],
    scale: usize,
) -> Result<Vec<u8>> {
    let (img_size, len) = image_dims(clustering.side(), scale)?;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .with_context(|| format!("allocating a {img_size}x{img_size} image"))?;
    pixels.resize(len, 0u8);

    for (row, labels) in clustering.rows().enumerate() {
        for (col, &label) in labels.iter().enumerate() {
            let color = palette[label as usize];
            let oy = row * scale;
            let ox = col * scale;
            for sy in 0..scale {
                let start = ((oy + sy) * img_size + ox) * 3;
                for px in pixels[start..start + scale * 3].chunks_exact_mut(3) {
                    px.copy_from_slice(&color);
                }
            }
        }
    }

    Ok(pixels)
}

/// Render `clustering` and write it as an RGB PNG.
pub fn write_clustering_png(
    clustering: &Clustering,
    palette_seed: u64,
    scale: usize,
    path: &Path,
) -> Result<()> {
    let palette = random_palette(clustering.num_clusters(), palette_seed);
    let pixels = clustering_to_rgb(clustering, &palette, scale)?;
    let (size, _) = image_dims(clustering.side(), scale)?;
    write_rgb_png(path, &pixels, size, size)
}

fn write_rgb_png(path: &Path, pixels: &[u8], width: usize, height: usize) -> Result<()> {
    let width = u32::try_from(width).context("image width exceeds the PNG limit")?;
    let height = u32::try_from(height).context("image height exceeds the PNG limit")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing PNG header for {}", path.display()))?;
    writer
        .write_image_data(pixels)
        .with_context(|| format!("writing PNG data for {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use percolate::{BondPattern, Lattice, LatticeClusterer};

    #[test]
    fn palette_has_one_color_per_cluster() {
        let palette = random_palette(17, 3);
        assert_eq!(palette.len(), 17);
        assert_eq!(palette, random_palette(17, 3));
    }

    #[test]
    fn scaled_sites_share_color() {
        let lattice = Lattice::new(2).unwrap();
        // Only the top row is joined.
        let mut bonds = BondPattern::from_fn(&lattice, |b| b.a == 0 && b.b == 1);
        let c = LatticeClusterer::new(2).unwrap().cluster(&mut bonds).unwrap();
        assert_eq!(c.num_clusters(), 3);

        let palette = vec![[10, 0, 0], [20, 0, 0], [30, 0, 0]];
        let rgb = clustering_to_rgb(&c, &palette, 2).unwrap();
        assert_eq!(rgb.len(), 4 * 4 * 3);

        let red: Vec<u8> = rgb.chunks_exact(3).map(|p| p[0]).collect();
        #[rustfmt::skip]
        let expected = [
            10, 10, 10, 10,
            10, 10, 10, 10,
            20, 20, 30, 30,
            20, 20, 30, 30,
        ];
        assert_eq!(red, expected);
    }

    #[test]
    fn oversized_scale_is_an_error() {
        let c = LatticeClusterer::new(100)
            .unwrap()
            .cluster(&mut BondPattern::closed(&Lattice::new(100).unwrap()))
            .unwrap();
        let palette = random_palette(c.num_clusters(), 1);
        assert!(clustering_to_rgb(&c, &palette, 100_000_000).is_err());
        assert!(clustering_to_rgb(&c, &palette, usize::MAX).is_err());
    }

    #[test]
    fn image_dims_checked() {
        assert_eq!(image_dims(3, 2).unwrap(), (6, 108));
        assert!(image_dims(usize::MAX, 2).is_err());
        assert!(image_dims(1 << 31, 1 << 2).is_err());
    }

    #[test]
    fn width_beyond_u32_rejected_before_encoding() {
        let path = std::env::temp_dir().join("percolate_width_beyond_u32.png");
        let r = write_rgb_png(&path, &[], u32::MAX as usize + 1, 1);
        assert!(r.is_err());
        assert!(!path.exists());
    }
}
