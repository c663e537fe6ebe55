//! One Page Plus: dense single-column layout. Header row with the photo on the right,
//! then full-width sections split into a label column and a content column under a
//! dashed rule. The PDF exporter follows the same arrangement.

use super::node::Node;
use super::selection::{ResumeView, SectionKind};
use super::{bullet_list, link_node, maybe_linked, profile_image, section_root, RenderOptions};

const LINK: &str = "link";

fn ruled(kind: SectionKind, content: Node) -> Node {
    section_root(kind, "ruled")
        .child(Node::el("h2").class("ruled-label").with_text(kind.title().to_uppercase()))
        .child(Node::el("div").class("ruled-content").child(content))
}

fn header(view: &ResumeView, options: &RenderOptions) -> Node {
    let headline = match &view.label {
        Some(label) => format!("{}, {}", view.name, label),
        None => view.name.clone(),
    };

    let mut text = Node::el("div")
        .class("header-text")
        .child(Node::el("h1").with_text(headline));

    if view.has(SectionKind::Contact) {
        let c = &view.contact;
        text = text.child(
            Node::el("div")
                .class("contact divided")
                .section(SectionKind::Contact.key())
                .maybe_child(c.email.as_ref().map(|e| link_node(e, LINK, options)))
                .maybe_child(c.phone.as_ref().map(|p| Node::el("span").with_text(p.as_str())))
                .maybe_child(c.city.as_ref().map(|city| Node::el("span").with_text(city.as_str())))
                .maybe_child(c.website.as_ref().map(|w| link_node(w, LINK, options))),
        );
    }

    if view.has(SectionKind::Profiles) {
        text = text.child(
            Node::el("div")
                .class("profiles")
                .section(SectionKind::Profiles.key())
                .children(view.profiles.iter().map(|p| {
                    Node::el("div")
                        .class("profile")
                        .with_text(format!("{}:", p.network.label()))
                        .child(link_node(&p.link, LINK, options))
                })),
        );
    }

    Node::el("header")
        .class("header")
        .child(text)
        .maybe_child(profile_image(view.image.as_deref(), &view.name, "avatar avatar-md"))
}

pub fn layout(view: &ResumeView, options: &RenderOptions) -> Node {
    let mut root = Node::el("div")
        .class("resume template-one-page-plus")
        .attr("data-template", "one-page-plus")
        .child(header(view, options));

    if let Some(summary) = &view.summary {
        root = root.child(ruled(
            SectionKind::Summary,
            Node::el("p").class("pre-line").with_text(summary.as_str()),
        ));
    }

    if view.has(SectionKind::Skills) {
        root = root.child(ruled(
            SectionKind::Skills,
            Node::el("div").children(view.skills.iter().map(|skill| {
                Node::el("div")
                    .class("skill-row")
                    .maybe_child(skill.name.as_ref().map(|n| Node::el("h3").with_text(format!("{n}:"))))
                    .child(Node::el("p").with_text(skill.keywords.join(" / ")))
            })),
        ));
    }

    if view.has(SectionKind::Experience) {
        root = root.child(ruled(
            SectionKind::Experience,
            Node::el("div").children(view.experience.iter().map(|work| {
                let title = Node::el("div")
                    .class("entry-title divided")
                    .maybe_child(work.position.as_ref().map(|p| Node::el("h3").with_text(p.as_str())))
                    .maybe_child(
                        work.company
                            .as_ref()
                            .map(|c| maybe_linked(c, work.company_url.as_deref(), LINK, options)),
                    );
                Node::el("div")
                    .class("entry")
                    .child(
                        Node::el("div")
                            .class("entry-head")
                            .child(title)
                            .child(Node::el("div").class("dates").with_text(work.dates.as_str())),
                    )
                    .maybe_child(work.summary.as_ref().map(|s| Node::el("p").with_text(s.as_str())))
                    .maybe_child(bullet_list(&work.highlights, "bullets"))
            })),
        ));
    }

    if view.has(SectionKind::Projects) {
        root = root.child(ruled(
            SectionKind::Projects,
            Node::el("div").children(view.projects.iter().map(|project| {
                let technology = (!project.keywords.is_empty()).then(|| {
                    Node::el("div")
                        .class("technology")
                        .child(Node::el("span").with_text("Technology:"))
                        .child(Node::el("p").with_text(project.keywords.join(" / ")))
                });
                Node::el("div")
                    .class("entry")
                    .maybe_child(
                        project
                            .name
                            .as_ref()
                            .map(|n| Node::el("h3").child(maybe_linked(n, project.url.as_deref(), LINK, options))),
                    )
                    .maybe_child(project.description.as_ref().map(|d| Node::el("p").with_text(d.as_str())))
                    .maybe_child(technology)
                    .maybe_child(bullet_list(&project.highlights, "bullets"))
            })),
        ));
    }

    if view.has(SectionKind::Education) {
        root = root.child(ruled(
            SectionKind::Education,
            Node::el("div").children(view.education.iter().map(|edu| {
                Node::el("div").class("entry entry-head").child(
                    Node::el("div")
                        .maybe_child(edu.institution.as_ref().map(|i| {
                            Node::el("h3").child(maybe_linked(i, edu.url.as_deref(), LINK, options))
                        }))
                        .maybe_child(edu.degree.as_ref().map(|d| Node::el("p").with_text(d.as_str())))
                        .maybe_child(edu.score.as_ref().map(|s| Node::el("p").class("muted").with_text(format!("GPA: {s}"))))
                        .maybe_child((!edu.courses.is_empty()).then(|| {
                            Node::el("p").class("muted").with_text(format!("Courses: {}", edu.courses.join(", ")))
                        })),
                )
                .child(Node::el("div").class("dates").with_text(edu.dates.as_str()))
            })),
        ));
    }

    if view.has(SectionKind::Languages) {
        root = root.child(ruled(
            SectionKind::Languages,
            Node::el("p").with_text(
                view.languages
                    .iter()
                    .map(|l| match &l.fluency {
                        Some(f) => format!("{} ({f})", l.language),
                        None => l.language.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(" / "),
            ),
        ));
    }

    if let Some(info) = &view.additional_information {
        root = root.child(ruled(
            SectionKind::AdditionalInformation,
            Node::el("p").class("pre-line").with_text(info.as_str()),
        ));
    }

    root
}
