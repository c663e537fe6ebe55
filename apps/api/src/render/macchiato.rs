//! Macchiato: name banner over a narrow sidebar (photo, about, profiles, skills,
//! languages) and a wide main column (summary, experience, projects, education).

use super::node::Node;
use super::selection::{ResumeView, SectionKind};
use super::{bullet_list, link_node, maybe_linked, profile_image, section_root, RenderOptions};

const ACCENT: &str = "text-accent";

fn heading(title: &str) -> Node {
    Node::el("h5")
        .class("heading")
        .with_text(title)
        .child(Node::el("hr").class("separator"))
}

fn badges(keywords: &[String]) -> Option<Node> {
    if keywords.is_empty() {
        return None;
    }
    Some(
        Node::el("div")
            .class("badges")
            .children(keywords.iter().map(|k| Node::el("span").class("badge").with_text(k.as_str()))),
    )
}

pub fn layout(view: &ResumeView, options: &RenderOptions) -> Node {
    let banner = Node::el("div")
        .class("banner")
        .child(Node::el("h1").class("name").with_text(view.name.as_str()))
        .maybe_child(view.label.as_ref().map(|l| Node::el("p").class(ACCENT).with_text(l.as_str())));

    let mut sidebar = Node::el("div")
        .class("sidebar")
        .maybe_child(profile_image(view.image.as_deref(), &view.name, "avatar avatar-lg"));

    if view.has(SectionKind::Contact) {
        let c = &view.contact;
        sidebar = sidebar.child(
            section_root(SectionKind::Contact, "about")
                .child(heading("About"))
                .maybe_child(c.city.as_ref().map(|city| Node::el("p").class("contact-line").with_text(city.as_str())))
                .maybe_child(c.email.as_ref().map(|e| link_node(e, "contact-line link", options)))
                .maybe_child(c.phone.as_ref().map(|p| Node::el("p").class("contact-line").with_text(p.as_str())))
                .maybe_child(c.website.as_ref().map(|w| link_node(w, "contact-line link", options))),
        );
    }

    if view.has(SectionKind::Profiles) {
        sidebar = sidebar.child(
            section_root(SectionKind::Profiles, "profiles")
                .child(heading(SectionKind::Profiles.title()))
                .children(view.profiles.iter().map(|p| {
                    Node::el("div")
                        .class("profile")
                        .attr("data-network", p.network.label())
                        .child(link_node(&p.link, "contact-line link", options))
                })),
        );
    }

    if view.has(SectionKind::Skills) {
        sidebar = sidebar.child(
            section_root(SectionKind::Skills, "skills").children(view.skills.iter().map(|skill| {
                Node::el("div")
                    .class("skill-group")
                    .child(heading(skill.name.as_deref().unwrap_or("")))
                    .maybe_child(skill.level.as_ref().map(|l| Node::el("p").class("muted").with_text(l.as_str())))
                    .maybe_child(badges(&skill.keywords))
            })),
        );
    }

    if view.has(SectionKind::Languages) {
        sidebar = sidebar.child(
            section_root(SectionKind::Languages, "languages")
                .child(heading(SectionKind::Languages.title()))
                .children(view.languages.iter().map(|l| {
                    Node::el("div")
                        .class("language")
                        .child(Node::el("span").with_text(l.language.as_str()))
                        .maybe_child(
                            l.fluency
                                .as_ref()
                                .map(|f| Node::el("span").class("muted italic").with_text(format!("({f})"))),
                        )
                })),
        );
    }

    let mut main = Node::el("div").class("main");

    if let Some(summary) = &view.summary {
        main = main.child(
            section_root(SectionKind::Summary, "summary")
                .child(heading(SectionKind::Summary.title()))
                .child(Node::el("p").class("pre-line").with_text(summary.as_str())),
        );
    }

    if view.has(SectionKind::Experience) {
        main = main.child(
            section_root(SectionKind::Experience, "experience")
                .child(heading(SectionKind::Experience.title()))
                .children(view.experience.iter().map(|work| {
                    let title = Node::el("div")
                        .class("entry-title")
                        .maybe_child(work.position.as_ref().map(|p| Node::el("h3").with_text(format!("{p} -"))))
                        .maybe_child(work.company.as_ref().map(|c| {
                            maybe_linked(c, work.company_url.as_deref(), ACCENT, options)
                        }));
                    Node::el("div")
                        .class("entry")
                        .child(
                            Node::el("div")
                                .class("entry-head")
                                .child(title)
                                .child(Node::el("div").class("dates").with_text(work.dates.as_str())),
                        )
                        .maybe_child(work.summary.as_ref().map(|s| Node::el("p").with_text(s.as_str())))
                        .maybe_child(bullet_list(&work.highlights, "highlights"))
                })),
        );
    }

    if view.has(SectionKind::Projects) {
        main = main.child(
            section_root(SectionKind::Projects, "projects")
                .child(heading(SectionKind::Projects.title()))
                .children(view.projects.iter().map(|project| {
                    Node::el("div")
                        .class("entry")
                        .maybe_child(project.name.as_ref().map(|n| {
                            Node::el("h3").child(maybe_linked(n, project.url.as_deref(), ACCENT, options))
                        }))
                        .maybe_child(project.description.as_ref().map(|d| Node::el("p").with_text(d.as_str())))
                        .maybe_child(badges(&project.keywords))
                        .maybe_child(bullet_list(&project.highlights, "highlights"))
                })),
        );
    }

    if view.has(SectionKind::Education) {
        main = main.child(
            section_root(SectionKind::Education, "education")
                .child(heading(SectionKind::Education.title()))
                .children(view.education.iter().map(|edu| {
                    let detail = match (&edu.degree, &edu.score) {
                        (Some(d), Some(s)) => Some(format!("{d} - GPA: {s}")),
                        (Some(d), None) => Some(d.clone()),
                        (None, Some(s)) => Some(format!("GPA: {s}")),
                        (None, None) => None,
                    };
                    Node::el("div")
                        .class("entry")
                        .child(
                            Node::el("div")
                                .class("entry-head")
                                .maybe_child(edu.institution.as_ref().map(|i| {
                                    Node::el("h3").child(maybe_linked(i, edu.url.as_deref(), ACCENT, options))
                                }))
                                .child(Node::el("div").class("dates").with_text(edu.dates.as_str())),
                        )
                        .maybe_child(detail.map(|d| Node::el("p").with_text(d)))
                        .maybe_child(bullet_list(&edu.courses, "courses"))
                })),
        );
    }

    let footer = view.additional_information.as_ref().map(|info| {
        section_root(SectionKind::AdditionalInformation, "footer")
            .child(heading(SectionKind::AdditionalInformation.title()))
            .child(Node::el("p").class("pre-line").with_text(info.as_str()))
    });

    Node::el("div")
        .class("resume template-macchiato")
        .attr("data-template", "macchiato")
        .child(banner)
        .child(Node::el("div").class("columns").child(sidebar).child(main))
        .maybe_child(footer)
}
