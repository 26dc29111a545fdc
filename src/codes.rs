// SPDX-FileCopyrightText: 2025 Joshua Goins <josh@redstrate.com>
// SPDX-License-Identifier: GPL-3.0-or-later

use paste::paste;

define_code_table! {
    /// How the material is composited. Stored as a single byte.
    pub struct BlendMode(u8) {
        Opaque => "Opaque",
        Additive => "Additive",
        Multiply => "Multiply",
        AlphaBlend => "Alpha_Blend",
        DoubleMultiply => "Double_Multiply",
        PreMultipliedAlpha => "Pre_Multiplied_Alpha",
        Maximum => "Maximum",
        MultiplyAdd => "Multiply_Add",
        AddSourceTimesDestinationAlpha => "Add_Source_Times_Destination_Alpha",
        AddSourceTimesSourceAlpha => "Add_Source_Times_Source_Alpha",
        InvAlphaBlend => "Inv_Alpha_Blend",
        MotionBlurStatic => "Motion_Blur_Static",
        MotionBlurInhibit => "Motion_Blur_Inhibit",
        ApplyShadowIntoShadowMask => "Apply_Shadow_Into_Shadow_Mask",
        AlphaBlendConstant => "Alpha_Blend_Constant",
        OverdrawApply => "Overdraw_Apply",
        WetScreenEffect => "Wet_Screen_Effect",
        Minimum => "Minimum",
        ReverseSubtract => "Reverse_Subtract",
        ForgeLightmap => "Forge_Lightmap",
        ForgeLightmapInv => "Forge_Lightmap_Inv",
        ReplaceAllChannels => "Replace_All_Channels",
        AlphaBlendMax => "Alpha_Blend_Max",
        OpaqueAlphaBlend => "Opaque_Alpha_Blend",
        AlphaBlendAdditiveTransparent => "Alpha_Blend_Additive_Transparent",
    }
}

define_code_table! {
    /// How transparent materials interact with shadows.
    pub struct ShadowPolicy(i32) {
        None => "None",
        RenderAsDecal => "Render_as_decal",
        RenderWithMaterial => "Render_with_material",
    }
}

define_code_table! {
    /// Texture addressing mode.
    pub struct WrapMode(u16) {
        Wrap => "wrap",
        Clamp => "clamp",
        Mirror => "mirror",
        BlackBorder => "black_border",
        MirrorOnce => "mirror_once",
        MirrorOnceBorder => "mirror_once_border",
    }
}

define_code_table! {
    /// Texture filtering mode.
    pub struct FilterMode(u16) {
        Trilinear => "trilinear",
        Point => "point",
        Bilinear => "bilinear",
        Unused0 => "UNUSED_0",
        AnisotropicTwoExpensive => "anisotropic_two_expensive",
        Unused1 => "UNUSED_1",
        AnisotropicFourExpensive => "anisotropic_four_EXPENSIVE",
        LightprobeTextureArray => "lightprobe_texture_array",
        TextureArrayQuadlinear => "texture_array_quadlinear",
        TextureArrayQuadanisotropicTwo => "texture_array_quadanisotropic_two",
    }
}

define_code_table! {
    /// Mip sharpening, from heavy blur to heavy sharpen.
    pub struct SharpenMode(u16) {
        Blur200 => "blur2.00",
        Blur175 => "blur1.75",
        Blur150 => "blur1.50",
        Blur125 => "blur1.25",
        Blur100 => "blur1.00",
        Blur075 => "blur0.75",
        Blur050 => "blur0.50",
        Blur025 => "blur0.25",
        Neutral => "0.0",
        Sharpen025 => "sharpen0.25",
        Sharpen050 => "sharpen0.50",
        Sharpen075 => "sharpen0.75",
        Sharpen100 => "sharpen1.00",
    }
}

define_code_table! {
    /// Where a bitmap parameter's texture comes from at runtime.
    pub struct ExternMode(u16) {
        UseBitmapAsNormal => "use_bitmap_as_normal",
        AlbedoBuffer => "albedo_buffer",
        NormalBuffer => "normal_buffer",
        DynamicUi => "dynamic_UI",
        DepthCamera => "depth_camera",
    }
}

define_code_table! {
    /// Color curve a bitmap was authored with, as recorded in the bitmap database.
    pub struct BitmapCurve(u8) {
        Unknown => "unknown",
        XRgb => "xRGB",
        Gamma20 => "gamma_2.0",
        Linear => "linear",
        OffsetLog => "offset_log",
        SRgb => "sRGB",
    }
}

/// Gamma used when a curve isn't recognized, or a bitmap isn't in the database at all.
pub const DEFAULT_CURVE_GAMMA: f32 = 1.0;

impl BitmapCurve {
    /// Returns the gamma multiplier for this curve.
    pub fn gamma(&self) -> f32 {
        match *self {
            BitmapCurve::X_RGB => 1.95,
            BitmapCurve::GAMMA20 => 2.0,
            BitmapCurve::S_RGB => 2.2,
            _ => DEFAULT_CURVE_GAMMA,
        }
    }
}
