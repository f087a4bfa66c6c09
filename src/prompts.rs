//! Static guidance tables and fixed system instructions fed into requests.

pub const DETECT_SYSTEM_PROMPT: &str = "You are a precise product identifier for e-commerce photo shoots. Identify the main product only; ignore people and background clutter. Return ONLY valid JSON, no additional text.";

pub const DETECT_USER_PROMPT: &str = r#"Identify the main product in the photo and return JSON only.
Schema:
{
  "product": "short product name",
  "category": "category (e.g. shoes, headphones, bag)",
  "attributes": ["attribute1", "attribute2"],
  "confidence": 85
}
Return at most 6 attributes and focus on visual and physical characteristics.
"confidence" is an integer from 0 to 100."#;

pub const IDEAS_SYSTEM_PROMPT: &str = "You are a creative product photography director. Generate commercially viable, distinct shoot concepts. Return ONLY valid JSON, no additional text.";

pub const IDEAS_SCHEMA_PROMPT: &str = r#"Suggest 5 distinct shoot ideas for this product. Every idea must be unique and commercially valuable.
Return JSON only. Schema:
{
  "ideas": [
    {
      "id": "I1",
      "title": "short title",
      "summary": "one or two sentences describing the concept",
      "why_it_works": "commercial rationale",
      "shot_keywords": ["keyword1", "keyword2", "keyword3"]
    }
  ]
}
Use ids I1, I2, ... in order."#;

pub const PROMPTS_SYSTEM_PROMPT: &str = "You are a senior photo art director and an expert writer of prompts for image generation models. Create detailed, actionable shot plans that are distinct and professionally viable. Return ONLY valid JSON, no additional text.";

pub const PROMPTS_SCHEMA_PROMPT: &str = r#"Write detailed shot plans for the selected idea. Every plan must differ from the others and be production ready.
Return JSON only. Schema:
{
  "shots": [
    {
      "index": 1,
      "title": "short title",
      "camera": { "angle": "e.g. 45 degrees, top-down, eye-level", "lens": "e.g. 50mm, 85mm macro", "aperture": "e.g. f/2.8, f/8" },
      "lighting": "detailed lighting setup",
      "background": "background and environment",
      "props": "props, or none",
      "composition": "composition rules",
      "instructions": "step-by-step shooting instructions",
      "prompt": "a complete, self-contained image generation prompt for this shot",
      "negative_prompt": "things the image must not contain"
    }
  ]
}"#;

#[derive(Debug, Clone, Copy)]
pub struct StyleTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub tone: &'static str,
    pub lighting: &'static str,
    pub background: &'static str,
    pub props: &'static str,
    pub composition: &'static str,
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

pub const DEFAULT_STYLE_KEY: &str = "minimal";

pub static STYLE_TEMPLATES: &[StyleTemplate] = &[
    StyleTemplate {
        key: "minimal",
        name: "Minimal & Modern",
        tone: "clean, simple, focused on product details",
        lighting: "soft diffused light, no harsh shadows, even illumination",
        background: "solid colors (white, gray, pastel) or simple textures",
        props: "minimal or none, only if essential",
        composition: "centered, negative space, rule of thirds",
        keywords: &["minimalist", "clean", "simple", "focused", "modern", "sleek"],
        description: "On a plain tabletop with a minimal backdrop that puts the product details first",
    },
    StyleTemplate {
        key: "luxury",
        name: "Luxury & Premium",
        tone: "elegant, sophisticated, high-end",
        lighting: "dramatic lighting, high contrast, rim light, golden accents",
        background: "marble, velvet, silk, dark moody surfaces",
        props: "gold or silver accents, premium accessories",
        composition: "dramatic angles, depth, layered composition",
        keywords: &["luxurious", "elegant", "premium", "high-end", "exclusive"],
        description: "On marble or velvet with gold accents under dramatic light",
    },
    StyleTemplate {
        key: "lifestyle",
        name: "Lifestyle & Natural",
        tone: "natural, relatable, authentic, everyday use",
        lighting: "natural light, warm tones, soft shadows",
        background: "real-life settings such as home, cafe, office or outdoors",
        props: "everyday items, hands in action, people using the product",
        composition: "candid framing, natural poses, environmental context",
        keywords: &["lifestyle", "natural", "authentic", "everyday", "real-life"],
        description: "In a real-life setting under natural light, captured in the moment of use",
    },
    StyleTemplate {
        key: "vintage",
        name: "Vintage & Retro",
        tone: "nostalgic, timeless, classic",
        lighting: "warm tones, slightly muted colors, film-like rendering",
        background: "aged wood, vintage paper, rustic materials",
        props: "retro accessories, old cameras, books",
        composition: "centered, symmetrical, classic framing",
        keywords: &["vintage", "retro", "nostalgic", "classic", "heritage"],
        description: "On an old wooden table with vintage accessories in a retro atmosphere",
    },
    StyleTemplate {
        key: "bold",
        name: "Bold & Vibrant",
        tone: "energetic, eye-catching, vibrant",
        lighting: "bright, saturated, high-key lighting",
        background: "bright solid colors, geometric patterns, contrasting backdrops",
        props: "colorful items, contrasting elements",
        composition: "dynamic angles, asymmetric, creative framing",
        keywords: &["bold", "vibrant", "colorful", "energetic", "dynamic"],
        description: "Against a bright colored backdrop with a daring, lively composition",
    },
    StyleTemplate {
        key: "industrial",
        name: "Industrial & Urban",
        tone: "raw, edgy, urban",
        lighting: "hard light, dramatic shadows, warehouse lighting",
        background: "concrete, metal, brick walls",
        props: "metal objects, tools, urban elements",
        composition: "strong lines, geometric shapes, architectural elements",
        keywords: &["industrial", "urban", "raw", "edgy", "gritty"],
        description: "In front of concrete or brick under hard light with an industrial feel",
    },
    StyleTemplate {
        key: "decorative",
        name: "Decorative & Artistic",
        tone: "artistic, aesthetic, product presented as an art piece",
        lighting: "soft natural light with deliberate artistic shadows",
        background: "styled arrangements with flowers, fabrics and objects",
        props: "flowers, ribbons, fabrics, books, candles",
        composition: "flatlay or overhead, balanced artistic arrangement",
        keywords: &["decorative", "artistic", "aesthetic", "flatlay", "composed"],
        description: "Among flowers and decorative objects, presented like a work of art",
    },
    StyleTemplate {
        key: "white_background",
        name: "White Background",
        tone: "professional, clean, e-commerce standard",
        lighting: "bright, even lighting without shadows",
        background: "pure white seamless backdrop (#FFFFFF)",
        props: "none, product only",
        composition: "centered, product fills the frame, multiple angles",
        keywords: &["white background", "clean", "professional", "ecommerce", "catalog"],
        description: "On a pure white background in a professional studio, product only",
    },
    StyleTemplate {
        key: "flatlay",
        name: "Flat Lay",
        tone: "organized, aesthetic, overhead perspective",
        lighting: "even overhead lighting, soft shadows",
        background: "flat surface such as wood, marble, fabric or paper",
        props: "complementary items arranged with care",
        composition: "90-degree overhead angle, symmetrical or asymmetrical arrangement",
        keywords: &["flatlay", "overhead", "arrangement", "organized", "top-down"],
        description: "Arranged on a flat surface and shot from directly above",
    },
    StyleTemplate {
        key: "editorial",
        name: "Editorial",
        tone: "storytelling, aspirational, magazine quality",
        lighting: "creative lighting, dramatic or soft depending on the story",
        background: "conceptual, themed environments",
        props: "storytelling elements, thematic accessories",
        composition: "narrative-driven, creative angles",
        keywords: &["editorial", "magazine", "storytelling", "aspirational", "brand"],
        description: "Magazine-style scenes that tell a story and carry the brand's character",
    },
    StyleTemplate {
        key: "studio_clean",
        name: "Clean Studio",
        tone: "professional, polished, high quality",
        lighting: "controlled studio lighting with softboxes",
        background: "neutral white, gray or beige backdrop",
        props: "minimal, professional setup",
        composition: "clean lines, technical precision",
        keywords: &["studio", "professional", "clean", "controlled", "polished"],
        description: "In a professional studio under controlled lighting",
    },
    StyleTemplate {
        key: "dark_moody",
        name: "Dark & Moody",
        tone: "mysterious, dramatic, atmospheric",
        lighting: "low-key lighting, chiaroscuro, deep shadows",
        background: "black, charcoal or other deep tones",
        props: "dark elegant items",
        composition: "strong contrast, depth, dramatic angles",
        keywords: &["dark", "moody", "dramatic", "mysterious", "low-key"],
        description: "On a dark background with dramatic shadows and an atmospheric mood",
    },
    StyleTemplate {
        key: "natural_light",
        name: "Natural Light",
        tone: "authentic, soft, organic",
        lighting: "window light, golden hour, soft natural shadows",
        background: "home environments and simple natural backdrops",
        props: "natural materials, organic elements",
        composition: "soft, candid feel",
        keywords: &["natural light", "authentic", "soft", "organic", "window light"],
        description: "In natural light with soft shadows and an honest atmosphere",
    },
    StyleTemplate {
        key: "outdoor",
        name: "Outdoor",
        tone: "fresh, adventurous, real-world context",
        lighting: "daylight, golden hour, outdoor conditions",
        background: "nature, city streets, outdoor environments",
        props: "environmental elements",
        composition: "environmental context, real-world settings",
        keywords: &["outdoor", "nature", "fresh", "environmental"],
        description: "Outdoors, in nature or on city streets",
    },
    StyleTemplate {
        key: "macro_detail",
        name: "Macro Detail",
        tone: "detailed, technical, quality focused",
        lighting: "focused light that brings out texture",
        background: "blurred or neutral",
        props: "none",
        composition: "extreme close-up, shallow depth of field",
        keywords: &["macro", "detail", "close-up", "texture", "intricate"],
        description: "Extreme close-ups that emphasize detail and texture",
    },
    StyleTemplate {
        key: "monochrome",
        name: "Monochrome",
        tone: "timeless, classic, artistic",
        lighting: "emphasis on contrast and tonal range",
        background: "any background, rendered in black and white",
        props: "chosen for shape and contrast rather than color",
        composition: "form, texture and contrast",
        keywords: &["monochrome", "black and white", "timeless", "contrast"],
        description: "Black and white, focused on form and contrast",
    },
    StyleTemplate {
        key: "seasonal",
        name: "Seasonal",
        tone: "timely, festive, trend-aligned",
        lighting: "matched to the season, warm for autumn and bright for summer",
        background: "fall leaves, snow, flowers, beach",
        props: "season-specific decorations",
        composition: "themed around the current season or an upcoming holiday",
        keywords: &["seasonal", "holiday", "festive", "themed"],
        description: "Styled with decorations and themes suited to the season",
    },
    StyleTemplate {
        key: "transparent",
        name: "Transparent & Reflective",
        tone: "technical, clean, glass-like",
        lighting: "controlled reflections, backlight for transparency",
        background: "clean backdrops that do not interfere with reflections",
        props: "reflective surfaces, glass elements",
        composition: "careful angle management for reflections",
        keywords: &["transparent", "glass", "reflective", "crystal"],
        description: "Special lighting techniques for transparent and reflective products",
    },
];

pub fn find_style(key: &str) -> Option<&'static StyleTemplate> {
    let key = key.trim();
    STYLE_TEMPLATES
        .iter()
        .find(|style| style.key.eq_ignore_ascii_case(key))
}

/// Delivery channel for the finished photos; shapes framing and aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct PlatformTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub aspect_ratio: &'static str,
    pub style_focus: &'static str,
    pub tips: &'static str,
}

pub const DEFAULT_PLATFORM_KEY: &str = "ecommerce";

pub static PLATFORM_TEMPLATES: &[PlatformTemplate] = &[
    PlatformTemplate {
        key: "instagram",
        name: "Instagram",
        aspect_ratio: "1:1 (square) or 9:16 (reels/stories)",
        style_focus: "eye-catching, bold colors, clean composition, trendy aesthetics",
        tips: "Leave space for text overlay, use trending color palettes, ensure mobile-friendly",
    },
    PlatformTemplate {
        key: "ecommerce",
        name: "E-commerce",
        aspect_ratio: "4:5 or 1:1",
        style_focus: "white/light background, multiple angles, detail shots, clear product view",
        tips: "Show product clearly from all angles, include size reference, consistent lighting",
    },
    PlatformTemplate {
        key: "pinterest",
        name: "Pinterest",
        aspect_ratio: "2:3 (vertical)",
        style_focus: "inspirational, mood board style, lifestyle context, vertical composition",
        tips: "Use text overlays with key info, create desire, show usage scenarios",
    },
    PlatformTemplate {
        key: "catalog",
        name: "Catalog",
        aspect_ratio: "1:1",
        style_focus: "professional, consistent lighting, clean background, standard angles",
        tips: "Multiple products same style, consistent color palette, uniform composition",
    },
];

pub fn find_platform(key: &str) -> Option<&'static PlatformTemplate> {
    let key = key.trim();
    PLATFORM_TEMPLATES
        .iter()
        .find(|platform| platform.key.eq_ignore_ascii_case(key))
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryGuideline {
    pub key: &'static str,
    pub focus: &'static str,
    pub common_settings: &'static [&'static str],
    pub must_show: &'static [&'static str],
    pub avoid: &'static str,
}

pub static CATEGORY_GUIDELINES: &[CategoryGuideline] = &[
    CategoryGuideline {
        key: "fashion",
        focus: "texture, fit, movement, drape",
        common_settings: &["studio white background", "outdoor lifestyle", "editorial dark mood"],
        must_show: &["fabric detail and texture", "how it fits on the body", "styling options"],
        avoid: "busy backgrounds that distract from the clothing",
    },
    CategoryGuideline {
        key: "food",
        focus: "texture, freshness, appetite appeal, ingredients",
        common_settings: &["rustic wood table", "bright modern kitchen", "outdoor picnic"],
        must_show: &["steam or freshness cues", "key ingredients", "portion size"],
        avoid: "cold or unappetizing light, artificial-looking food",
    },
    CategoryGuideline {
        key: "tech",
        focus: "design details, features, scale, interfaces",
        common_settings: &["minimal clean background", "desk setup", "hands-on usage"],
        must_show: &["ports and buttons", "a size reference object", "screen quality"],
        avoid: "cluttered backgrounds, glare on screens",
    },
    CategoryGuideline {
        key: "home_decor",
        focus: "ambiance, texture, how it fits in a space",
        common_settings: &["styled room", "material close-ups", "lifestyle context"],
        must_show: &["the product in a room", "material close-up", "available colors"],
        avoid: "poor room styling, mismatched decor",
    },
    CategoryGuideline {
        key: "accessories",
        focus: "details, craftsmanship, how to wear or use",
        common_settings: &["flatlay composition", "on model or mannequin", "lifestyle in use"],
        must_show: &["craftsmanship details", "size and scale", "usage demonstration"],
        avoid: "unclear details, missed focus",
    },
    CategoryGuideline {
        key: "beauty",
        focus: "texture, color accuracy, application, results",
        common_settings: &["clean white background", "application in use", "before and after"],
        must_show: &["true color and texture", "application method", "result on skin"],
        avoid: "color inaccuracy, poor skin tone representation",
    },
];

pub static GENERIC_CATEGORY_GUIDELINE: CategoryGuideline = CategoryGuideline {
    key: "generic",
    focus: "product details, quality, usability",
    common_settings: &["clean background", "lifestyle context", "detail shots"],
    must_show: &["product details", "scale and size", "key features"],
    avoid: "poor lighting, cluttered backgrounds",
};

/// First table entry whose key occurs in `category`, ignoring case.
pub fn category_guideline(category: &str) -> &'static CategoryGuideline {
    let lowered = category.to_lowercase();
    CATEGORY_GUIDELINES
        .iter()
        .find(|guideline| lowered.contains(guideline.key))
        .unwrap_or(&GENERIC_CATEGORY_GUIDELINE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_match_is_case_insensitive_substring() {
        assert_eq!(category_guideline("Women's FASHION").key, "fashion");
        assert_eq!(category_guideline("consumer tech / audio").key, "tech");
        assert_eq!(category_guideline("garden tools").key, "generic");
    }

    #[test]
    fn style_lookup_ignores_case() {
        assert_eq!(find_style("Luxury").map(|s| s.key), Some("luxury"));
        assert!(find_style("unknown").is_none());
        assert!(find_style(DEFAULT_STYLE_KEY).is_some());
    }

    #[test]
    fn platform_lookup_ignores_case() {
        assert_eq!(find_platform(" Pinterest ").map(|p| p.key), Some("pinterest"));
        assert!(find_platform("tiktok").is_none());
        assert!(find_platform(DEFAULT_PLATFORM_KEY).is_some());
    }

    #[test]
    fn style_keys_are_unique() {
        let keys: HashSet<_> = STYLE_TEMPLATES.iter().map(|style| style.key).collect();
        assert_eq!(keys.len(), STYLE_TEMPLATES.len());
    }
}
