//! Starter templates.
//!
//! Pre-built documents users can pick instead of the blank default. Each
//! entry is a factory so every instantiation allocates fresh identifiers;
//! two instances of the same template never share an id.

use crate::factory::{
    attrs, create_body, create_button, create_column, create_column_with,
    create_default_document, create_divider, create_image, create_section, create_social,
    create_social_element, create_spacer, create_text,
};
use crate::model::{AttrMap, EmailDocument, EmailNode, HeadAttributes};

/// Catalog entry for the template picker.
pub struct StarterTemplate {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Accent color for the template card.
    pub color: &'static str,
    pub factory: fn() -> EmailDocument,
}

/// All built-in starter templates, in display order.
pub fn starter_templates() -> Vec<StarterTemplate> {
    vec![
        StarterTemplate {
            id: "blank",
            label: "Blank",
            description: "Start from scratch",
            icon: "File",
            color: "#9ca3af",
            factory: create_default_document,
        },
        StarterTemplate {
            id: "newsletter",
            label: "Newsletter",
            description: "News and articles",
            icon: "Newspaper",
            color: "#3b82f6",
            factory: newsletter_template,
        },
        StarterTemplate {
            id: "promo",
            label: "Promotion",
            description: "Product launch or sale",
            icon: "Tag",
            color: "#f59e0b",
            factory: promo_template,
        },
    ]
}

// ─── Shared building blocks ───

fn header_section(logo_text: &str) -> EmailNode {
    create_section(
        vec![create_column(vec![create_image(attrs(&[
            (
                "src",
                &format!("https://picsum.photos/seed/{logo_text}/150/50"),
            ),
            ("alt", "Logo"),
            ("width", "150px"),
            ("align", "center"),
            ("padding", "0"),
        ]))])],
        attrs(&[("background-color", "#ffffff"), ("padding", "20px 0")]),
    )
}

fn footer_section() -> EmailNode {
    create_section(
        vec![create_column_with(
            vec![
                create_social(
                    vec![
                        create_social_element(
                            "facebook",
                            "https://facebook.com/",
                            attrs(&[("background-color", "#555555")]),
                        ),
                        create_social_element(
                            "twitter",
                            "https://twitter.com/",
                            attrs(&[("background-color", "#555555")]),
                        ),
                        create_social_element(
                            "linkedin",
                            "https://linkedin.com/",
                            attrs(&[("background-color", "#555555")]),
                        ),
                    ],
                    attrs(&[
                        ("font-size", "11px"),
                        ("icon-size", "24px"),
                        ("mode", "horizontal"),
                        ("align", "center"),
                        ("padding", "0 0 15px 0"),
                        ("color", "#999999"),
                    ]),
                ),
                create_text(
                    r##"<p style="margin: 0;">You are receiving this email because you signed up on our platform.<br/><a href="#" style="color: #01A8AB; text-decoration: underline;">Unsubscribe</a> &nbsp;|&nbsp; <a href="#" style="color: #01A8AB; text-decoration: underline;">Preferences</a></p>"##,
                    attrs(&[
                        ("align", "center"),
                        ("font-size", "11px"),
                        ("color", "#999999"),
                        ("line-height", "1.6"),
                        ("padding", "0 20px"),
                    ]),
                ),
                create_text(
                    r#"<p style="margin: 0;">&copy; 2026 Your Company. All rights reserved.</p>"#,
                    attrs(&[
                        ("align", "center"),
                        ("font-size", "11px"),
                        ("color", "#666666"),
                        ("padding", "10px 0 0 0"),
                    ]),
                ),
            ],
            attrs(&[("padding", "0")]),
        )],
        attrs(&[("background-color", "#333333"), ("padding", "25px 20px")]),
    )
}

// ─── Templates ───

fn newsletter_template() -> EmailDocument {
    EmailDocument {
        version: 1,
        head_attributes: HeadAttributes {
            preview_text: "The latest news from our team".to_string(),
            ..HeadAttributes::default()
        },
        body: create_body(
            vec![
                header_section("newsletter"),
                create_section(
                    vec![create_column(vec![
                        create_text(
                            r#"<h1 style="margin: 0; line-height: 1.15;">Innovation at the heart of your strategy</h1>"#,
                            attrs(&[
                                ("align", "center"),
                                ("font-size", "30px"),
                                ("color", "#0f172a"),
                                ("padding", "0 20px 12px 20px"),
                            ]),
                        ),
                        create_text(
                            r#"<p style="margin: 0;">Discover the trends, tools and strategies shaping this quarter. Our experts share their insights.</p>"#,
                            attrs(&[
                                ("align", "center"),
                                ("font-size", "15px"),
                                ("color", "#64748b"),
                                ("line-height", "1.7"),
                                ("padding", "0 40px"),
                            ]),
                        ),
                        create_button(
                            "Read the full story",
                            attrs(&[("align", "center"), ("background-color", "#01A8AB")]),
                        ),
                    ])],
                    attrs(&[("background-color", "#ffffff"), ("padding", "35px 20px 30px 20px")]),
                ),
                create_section(
                    vec![create_column(vec![
                        create_image(attrs(&[
                            ("src", "https://images.example/newsletter-hero.jpg"),
                            ("alt", "Featured article"),
                            ("padding", "0"),
                        ])),
                        create_divider(attrs(&[("padding", "20px 0")])),
                        create_text(
                            r#"<p style="margin: 0;">Short takes from around the company, curated every month.</p>"#,
                            attrs(&[("font-size", "14px"), ("color", "#334155")]),
                        ),
                    ])],
                    attrs(&[("background-color", "#f8fafc"), ("padding", "30px")]),
                ),
                footer_section(),
            ],
            AttrMap::new(),
        ),
    }
}

fn promo_template() -> EmailDocument {
    EmailDocument {
        version: 1,
        head_attributes: HeadAttributes {
            preview_text: "Limited-time offer inside".to_string(),
            ..HeadAttributes::default()
        },
        body: create_body(
            vec![
                header_section("promo"),
                create_section(
                    vec![create_column(vec![
                        create_text(
                            r#"<p style="margin: 0; text-transform: uppercase; letter-spacing: 3px; font-weight: 600;">This week only</p>"#,
                            attrs(&[
                                ("align", "center"),
                                ("font-size", "11px"),
                                ("color", "#f59e0b"),
                                ("padding", "0 0 12px 0"),
                            ]),
                        ),
                        create_text(
                            r#"<h1 style="margin: 0;">-30% on everything</h1>"#,
                            attrs(&[
                                ("align", "center"),
                                ("font-size", "36px"),
                                ("color", "#111827"),
                                ("padding", "0 0 16px 0"),
                            ]),
                        ),
                        create_button(
                            "Shop now",
                            attrs(&[
                                ("align", "center"),
                                ("background-color", "#f59e0b"),
                                ("font-size", "15px"),
                            ]),
                        ),
                        create_spacer(attrs(&[("height", "10px")])),
                        create_text(
                            r#"<p style="margin: 0;">Offer valid until Sunday, while stocks last.</p>"#,
                            attrs(&[("align", "center"), ("font-size", "12px"), ("color", "#6b7280")]),
                        ),
                    ])],
                    attrs(&[("background-color", "#fffbeb"), ("padding", "40px 20px")]),
                ),
                footer_section(),
            ],
            AttrMap::new(),
        ),
    }
}
