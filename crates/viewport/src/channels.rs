use crate::types::{Channel, ChannelMask, ChannelMatrix};

/// How the enabled colour channels are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    /// Each enabled channel passes through in place.
    Color,
    /// No colour channel: alpha (if requested) is broadcast as grey.
    AlphaAsGrey,
    /// Exactly one colour channel and no alpha: that channel broadcast as grey.
    SoloGrey,
}

/// Decision table. The order matters: the colour-channel count is inspected
/// before the alpha request.
///
/// | colour channels | alpha  | presentation |
/// |-----------------|--------|--------------|
/// | 2 or 3          | any    | Color        |
/// | 0               | any    | AlphaAsGrey  |
/// | 1               | on     | Color        |
/// | 1               | off    | SoloGrey     |
fn presentation(colour_channels: u8, alpha: f32) -> Presentation {
    match (colour_channels, alpha != 0.0) {
        (2..=3, _) => Presentation::Color,
        (0, _) => Presentation::AlphaAsGrey,
        (_, true) => Presentation::Color,
        (_, false) => Presentation::SoloGrey,
    }
}

/// Builds the matrix the texture program multiplies each texel by.
pub fn channel_matrix(mask: ChannelMask) -> ChannelMatrix {
    let r = f32::from(u8::from(mask.red));
    let g = f32::from(u8::from(mask.green));
    let b = f32::from(u8::from(mask.blue));
    let a = mask.alpha;
    let count = u8::from(mask.red) + u8::from(mask.green) + u8::from(mask.blue);

    let rows = match presentation(count, a) {
        Presentation::Color => return ChannelMatrix::diagonal([r, g, b, a]),
        Presentation::AlphaAsGrey => [
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [a, a, a, 0.0],
        ],
        Presentation::SoloGrey => [
            [r, r, r, 0.0],
            [g, g, g, 0.0],
            [b, b, b, 0.0],
            [0.0, 0.0, 0.0, a],
        ],
    };
    ChannelMatrix { rows }
}

impl ChannelMask {
    pub fn is_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::Alpha => self.shows_alpha(),
        }
    }

    /// Flips one channel, leaving the others untouched.
    pub fn toggle(&mut self, channel: Channel) {
        match channel {
            Channel::Red => self.red = !self.red,
            Channel::Green => self.green = !self.green,
            Channel::Blue => self.blue = !self.blue,
            Channel::Alpha => self.alpha = if self.shows_alpha() { 0.0 } else { 1.0 },
        }
    }

    /// A mask with only `channel` enabled.
    pub fn solo(channel: Channel) -> Self {
        Self::new(
            channel == Channel::Red,
            channel == Channel::Green,
            channel == Channel::Blue,
            channel == Channel::Alpha,
        )
    }

    pub fn matrix(&self) -> ChannelMatrix {
        channel_matrix(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(r: bool, g: bool, b: bool, a: bool) -> ChannelMask {
        ChannelMask::new(r, g, b, a)
    }

    #[test]
    fn all_channels_is_identity() {
        assert_eq!(
            channel_matrix(mask(true, true, true, true)),
            ChannelMatrix::diagonal([1.0; 4])
        );
    }

    #[test]
    fn nothing_enabled_is_zero() {
        assert_eq!(channel_matrix(mask(false, false, false, false)), ChannelMatrix::ZERO);
    }

    #[test]
    fn solo_red_broadcasts_as_grey() {
        let matrix = channel_matrix(mask(true, false, false, false));
        assert_eq!(matrix.rows[0], [1.0, 1.0, 1.0, 0.0]);
        assert_ne!(matrix, ChannelMatrix::diagonal([1.0, 0.0, 0.0, 0.0]));
        let out = matrix.apply([0.25, 0.5, 0.75, 0.1]);
        assert_eq!(&out[..3], &[0.25, 0.25, 0.25]);
        // Alpha row is zeroed, so the compensation term makes the texel opaque.
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn solo_blue_broadcasts_blue() {
        let out = channel_matrix(mask(false, false, true, false)).apply([0.1, 0.2, 0.6, 0.0]);
        assert_eq!(&out[..3], &[0.6, 0.6, 0.6]);
    }

    #[test]
    fn alpha_only_is_broadcast_into_colour() {
        let matrix = channel_matrix(mask(false, false, false, true));
        assert_eq!(matrix.rows[3], [1.0, 1.0, 1.0, 0.0]);
        let out = matrix.apply([0.9, 0.8, 0.7, 0.4]);
        assert_eq!(out, [0.4, 0.4, 0.4, 1.0]);
    }

    #[test]
    fn single_colour_with_alpha_stays_in_colour() {
        let matrix = channel_matrix(mask(false, true, false, true));
        assert_eq!(matrix, ChannelMatrix::diagonal([0.0, 1.0, 0.0, 1.0]));
        let out = matrix.apply([0.3, 0.6, 0.9, 0.5]);
        assert_eq!(out, [0.0, 0.6, 0.0, 0.5]);
    }

    #[test]
    fn two_colours_pass_through_without_alpha() {
        let matrix = channel_matrix(mask(true, true, false, false));
        assert_eq!(matrix, ChannelMatrix::diagonal([1.0, 1.0, 0.0, 0.0]));
        let out = matrix.apply([0.3, 0.6, 0.9, 0.5]);
        assert_eq!(out, [0.3, 0.6, 0.0, 1.0]);
    }

    #[test]
    fn alpha_weight_is_carried_through() {
        let weighted = ChannelMask {
            alpha: 0.5,
            ..ChannelMask::new(false, false, false, false)
        };
        let matrix = channel_matrix(weighted);
        assert_eq!(matrix.rows[3], [0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn default_mask_hides_alpha() {
        let matrix = ChannelMask::default().matrix();
        assert_eq!(matrix, ChannelMatrix::diagonal([1.0, 1.0, 1.0, 0.0]));
        assert_eq!(matrix.apply([0.2, 0.4, 0.6, 0.0]), [0.2, 0.4, 0.6, 1.0]);
    }

    #[test]
    fn toggle_and_solo() {
        let mut mask = ChannelMask::default();
        mask.toggle(Channel::Green);
        assert!(!mask.green);
        mask.toggle(Channel::Alpha);
        assert!(mask.shows_alpha());
        mask.toggle(Channel::Alpha);
        assert!(!mask.is_enabled(Channel::Alpha));

        let solo = ChannelMask::solo(Channel::Alpha);
        assert_eq!(solo, ChannelMask::new(false, false, false, true));
        for channel in Channel::ALL {
            assert!(ChannelMask::solo(channel).is_enabled(channel));
        }
    }
}
