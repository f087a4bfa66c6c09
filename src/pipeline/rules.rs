//! Instruction assembly.
//!
//! A prompt is an ordered list of rules evaluated against a context; each
//! rule contributes one text block or nothing, and the blocks are joined in
//! order. Optional inputs map to rules that return `None` when the input is
//! absent.

use tracing::warn;

use crate::pipeline::types::Idea;
use crate::prompts::{
    category_guideline, find_platform, find_style, PlatformTemplate, StyleTemplate,
    DEFAULT_PLATFORM_KEY, DEFAULT_STYLE_KEY, IDEAS_SCHEMA_PROMPT, PLATFORM_TEMPLATES,
    PROMPTS_SCHEMA_PROMPT, STYLE_TEMPLATES,
};

pub type InstructionRule<C> = fn(&C) -> Option<String>;

pub fn assemble<C>(context: &C, rules: &[InstructionRule<C>]) -> String {
    rules
        .iter()
        .filter_map(|rule| rule(context))
        .filter(|block| !block.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Debug, Clone, Copy)]
pub struct IdeaContext<'a> {
    pub product: &'a str,
    pub category: &'a str,
    pub attributes: &'a [String],
    pub style: Option<&'a str>,
    pub platform: Option<&'a str>,
    pub include_model: Option<bool>,
}

#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub product: &'a str,
    pub category: &'a str,
    pub idea: &'a Idea,
    pub count: usize,
    pub style: Option<&'a str>,
    pub platform: Option<&'a str>,
    pub include_model: Option<bool>,
}

const MAX_ATTRIBUTES: usize = 6;

fn attribute_list(attributes: &[String]) -> String {
    let listed: Vec<&str> = attributes
        .iter()
        .map(|attribute| attribute.trim())
        .filter(|attribute| !attribute.is_empty())
        .take(MAX_ATTRIBUTES)
        .collect();
    if listed.is_empty() {
        "none listed".to_string()
    } else {
        listed.join(", ")
    }
}

fn resolve_style(key: &str) -> &'static StyleTemplate {
    find_style(key).unwrap_or_else(|| {
        warn!("Unknown style key '{key}'; using {DEFAULT_STYLE_KEY}");
        find_style(DEFAULT_STYLE_KEY).unwrap_or(&STYLE_TEMPLATES[0])
    })
}

fn style_block(key: Option<&str>) -> Option<String> {
    let key = key.map(str::trim).filter(|key| !key.is_empty())?;
    let style = resolve_style(key);
    Some(format!(
        "Style direction: {name}\n- Tone: {tone}\n- Lighting: {lighting}\n- Background: {background}\n- Props: {props}\n- Composition: {composition}\n- Keywords: {keywords}\n- Reference scene: {description}\nEvery idea must stay within this style.",
        name = style.name,
        tone = style.tone,
        lighting = style.lighting,
        background = style.background,
        props = style.props,
        composition = style.composition,
        keywords = style.keywords.join(", "),
        description = style.description,
    ))
}

fn resolve_platform(key: &str) -> &'static PlatformTemplate {
    find_platform(key).unwrap_or_else(|| {
        warn!("Unknown platform key '{key}'; using {DEFAULT_PLATFORM_KEY}");
        find_platform(DEFAULT_PLATFORM_KEY).unwrap_or(&PLATFORM_TEMPLATES[0])
    })
}

fn platform_block(key: Option<&str>) -> Option<String> {
    let key = key.map(str::trim).filter(|key| !key.is_empty())?;
    let platform = resolve_platform(key);
    Some(format!(
        "Target platform: {name}\n- Aspect ratio: {aspect_ratio}\n- Visual focus: {style_focus}\n- Tips: {tips}",
        name = platform.name,
        aspect_ratio = platform.aspect_ratio,
        style_focus = platform.style_focus,
        tips = platform.tips,
    ))
}

fn model_preference_block(include_model: Option<bool>) -> Option<String> {
    let text = if include_model? {
        "Human model: include a person in the shots. Show the product worn, held or used, describe pose, styling and framing, and keep the product the clear hero of every frame."
    } else {
        "Human model: do not include people, faces or hands. The product appears on its own or with props only."
    };
    Some(text.to_string())
}

fn category_block(category: &str) -> String {
    let guideline = category_guideline(category);
    format!(
        "Category guidance:\n- Focus on: {focus}\n- Proven settings: {settings}\n- Must show: {must_show}\n- Avoid: {avoid}",
        focus = guideline.focus,
        settings = guideline.common_settings.join("; "),
        must_show = guideline.must_show.join("; "),
        avoid = guideline.avoid,
    )
}

fn idea_schema(_: &IdeaContext<'_>) -> Option<String> {
    Some(IDEAS_SCHEMA_PROMPT.to_string())
}

fn idea_product(ctx: &IdeaContext<'_>) -> Option<String> {
    Some(format!(
        "Product: {}\nCategory: {}\nAttributes: {}",
        ctx.product.trim(),
        ctx.category.trim(),
        attribute_list(ctx.attributes)
    ))
}

fn idea_style(ctx: &IdeaContext<'_>) -> Option<String> {
    style_block(ctx.style)
}

fn idea_platform(ctx: &IdeaContext<'_>) -> Option<String> {
    platform_block(ctx.platform)
}

fn idea_model_preference(ctx: &IdeaContext<'_>) -> Option<String> {
    model_preference_block(ctx.include_model)
}

fn idea_category(ctx: &IdeaContext<'_>) -> Option<String> {
    Some(category_block(ctx.category))
}

pub fn idea_instructions(ctx: &IdeaContext<'_>) -> String {
    let rules: [InstructionRule<IdeaContext<'_>>; 6] = [
        |c| idea_schema(c),
        |c| idea_product(c),
        |c| idea_style(c),
        |c| idea_platform(c),
        |c| idea_model_preference(c),
        |c| idea_category(c),
    ];
    assemble(ctx, &rules)
}

fn prompt_schema(_: &PromptContext<'_>) -> Option<String> {
    Some(PROMPTS_SCHEMA_PROMPT.to_string())
}

fn prompt_subject(ctx: &PromptContext<'_>) -> Option<String> {
    let idea = ctx.idea;
    Some(format!(
        "Product: {product}\nCategory: {category}\nSelected idea ({id}): {title}\nConcept: {summary}\nWhy it works: {why}\nShot keywords: {keywords}\nRequested shots: {count}",
        product = ctx.product.trim(),
        category = ctx.category.trim(),
        id = idea.id,
        title = idea.title,
        summary = idea.summary,
        why = idea.why_it_works,
        keywords = idea.shot_keywords.join(", "),
        count = ctx.count,
    ))
}

fn prompt_diversity(ctx: &PromptContext<'_>) -> Option<String> {
    if ctx.count <= 1 {
        return Some(
            "Make the single shot the strongest expression of the idea, with a fully specified camera, lighting and composition."
                .to_string(),
        );
    }
    Some(format!(
        "Return exactly {count} shots indexed 1 to {count}. Each shot must use a different camera angle, lens or aperture, a different lighting setup and a different composition, while staying faithful to the selected idea. Do not repeat a prompt with minor wording changes.",
        count = ctx.count
    ))
}

fn prompt_style(ctx: &PromptContext<'_>) -> Option<String> {
    style_block(ctx.style)
}

fn prompt_platform(ctx: &PromptContext<'_>) -> Option<String> {
    platform_block(ctx.platform)
}

fn prompt_model_preference(ctx: &PromptContext<'_>) -> Option<String> {
    model_preference_block(ctx.include_model)
}

fn prompt_technical(_: &PromptContext<'_>) -> Option<String> {
    Some(
        "Each \"prompt\" must stand alone: name the product, the setting, the light, the camera and lens, the mood and the output quality (photorealistic, high resolution, commercial product photography)."
            .to_string(),
    )
}

pub fn prompt_instructions(ctx: &PromptContext<'_>) -> String {
    let rules: [InstructionRule<PromptContext<'_>>; 7] = [
        |c| prompt_schema(c),
        |c| prompt_subject(c),
        |c| prompt_diversity(c),
        |c| prompt_style(c),
        |c| prompt_platform(c),
        |c| prompt_model_preference(c),
        |c| prompt_technical(c),
    ];
    assemble(ctx, &rules)
}
