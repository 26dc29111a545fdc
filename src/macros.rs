// SPDX-FileCopyrightText: 2023 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

/// Creates a newtype over a raw integer code, along with its table of labels. For example, `AlphaBlend => "Alpha_Blend"` becomes a constant called ALPHA_BLEND.
///
/// Codes outside of the table are kept as-is and only their label degrades to "Unknown".
#[macro_export]
macro_rules! define_code_table {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($repr:ident) {
            $(
                $variant:ident => $label:literal
            ),+$(,)?
        }
    ) => {
        paste! {
            #[allow(dead_code)]
            #[repr($repr)]
            enum [<$name Variant>] {
                $($variant,)+
            }

            $(#[$meta])*
            #[binrw::binread]
            #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct $name(pub $repr);

            #[allow(clippy::unnecessary_fallible_conversions)]
            impl $name {
                $(
                    #[doc = concat!("`", $label, "`")]
                    pub const [<$variant:snake:upper>]: $name = $name([<$name Variant>]::$variant as $repr);
                )+

                /// Every known label, indexed by code.
                pub const LABELS: &'static [&'static str] = &[$($label,)+];

                /// Returns the label for this code, or "Unknown" if it's out of range.
                pub fn label(&self) -> &'static str {
                    usize::try_from(self.0)
                        .ok()
                        .and_then(|index| Self::LABELS.get(index))
                        .copied()
                        .unwrap_or("Unknown")
                }

                /// Whether this code is inside the table.
                pub fn is_known(&self) -> bool {
                    usize::try_from(self.0).is_ok_and(|index| index < Self::LABELS.len())
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    f.write_str(self.label())
                }
            }
        }
    };
}
