//! Rick Osborne: two-thirds main column (header, summary, experience, projects,
//! education) beside a one-third side column (photo, contact, profiles, skills,
//! languages). Social profiles link by network name.

use super::node::Node;
use super::selection::{ResumeView, SectionKind};
use super::{anchor, bullet_list, link_node, maybe_linked, profile_image, section_root, RenderOptions};

const LINK: &str = "link";

fn titled(kind: SectionKind) -> Node {
    section_root(kind, "block").child(Node::el("h2").class("block-title").with_text(kind.title().to_uppercase()))
}

fn chips(keywords: &[String]) -> Option<Node> {
    (!keywords.is_empty()).then(|| {
        Node::el("div")
            .class("chips")
            .children(keywords.iter().map(|k| Node::el("span").class("chip").with_text(k.as_str())))
    })
}

fn dated_head(left: Node, dates: &str) -> Node {
    Node::el("div")
        .class("entry-head")
        .child(left)
        .child(Node::el("div").class("dates").with_text(dates))
}

fn main_column(view: &ResumeView, options: &RenderOptions) -> Node {
    let mut column = Node::el("div").class("col-main").child(
        Node::el("header")
            .child(Node::el("h1").with_text(view.name.as_str()))
            .maybe_child(view.label.as_ref().map(|l| Node::el("p").class("muted").with_text(l.as_str()))),
    );

    if let Some(summary) = &view.summary {
        column = column.child(
            titled(SectionKind::Summary).child(Node::el("p").class("pre-line").with_text(summary.as_str())),
        );
    }

    if view.has(SectionKind::Experience) {
        column = column.child(titled(SectionKind::Experience).children(view.experience.iter().map(|work| {
            let left = Node::el("div")
                .maybe_child(work.position.as_ref().map(|p| Node::el("h3").with_text(p.as_str())))
                .maybe_child(work.company.as_ref().map(|c| {
                    Node::el("div").child(maybe_linked(c, work.company_url.as_deref(), LINK, options))
                }));
            Node::el("div")
                .class("entry")
                .child(dated_head(left, &work.dates))
                .maybe_child(work.summary.as_ref().map(|s| Node::el("p").with_text(s.as_str())))
                .maybe_child(bullet_list(&work.highlights, "bullets"))
        })));
    }

    if view.has(SectionKind::Projects) {
        column = column.child(titled(SectionKind::Projects).children(view.projects.iter().map(|project| {
            Node::el("div")
                .class("entry")
                .maybe_child(
                    project
                        .name
                        .as_ref()
                        .map(|n| Node::el("h3").child(maybe_linked(n, project.url.as_deref(), LINK, options))),
                )
                .maybe_child(project.description.as_ref().map(|d| Node::el("p").with_text(d.as_str())))
                .maybe_child(chips(&project.keywords))
                .maybe_child(bullet_list(&project.highlights, "bullets"))
        })));
    }

    if view.has(SectionKind::Education) {
        column = column.child(titled(SectionKind::Education).children(view.education.iter().map(|edu| {
            let left = Node::el("div")
                .maybe_child(edu.institution.as_ref().map(|i| Node::el("h3").child(maybe_linked(i, edu.url.as_deref(), LINK, options))))
                .maybe_child(edu.degree.as_ref().map(|d| Node::el("p").with_text(d.as_str())))
                .maybe_child(edu.score.as_ref().map(|s| Node::el("p").class("muted").with_text(format!("GPA: {s}"))));
            Node::el("div")
                .class("entry")
                .child(dated_head(left, &edu.dates))
                .maybe_child(chips(&edu.courses))
        })));
    }

    column
}

fn side_column(view: &ResumeView, options: &RenderOptions) -> Node {
    let mut column = Node::el("div")
        .class("col-side")
        .maybe_child(profile_image(view.image.as_deref(), &view.name, "avatar avatar-lg"));

    if view.has(SectionKind::Contact) {
        let c = &view.contact;
        column = column.child(
            titled(SectionKind::Contact)
                .maybe_child(c.city.as_ref().map(|city| Node::el("div").class("contact-line").with_text(city.as_str())))
                .maybe_child(c.email.as_ref().map(|e| Node::el("div").class("contact-line").child(link_node(e, LINK, options))))
                .maybe_child(c.phone.as_ref().map(|p| Node::el("div").class("contact-line").with_text(p.as_str())))
                .maybe_child(c.website.as_ref().map(|w| Node::el("div").class("contact-line").child(link_node(w, LINK, options)))),
        );
    }

    if view.has(SectionKind::Profiles) {
        column = column.child(titled(SectionKind::Profiles).children(view.profiles.iter().map(|p| {
            Node::el("div")
                .class("contact-line")
                .child(anchor(&p.link.href, p.network.label(), LINK, options))
        })));
    }

    if view.has(SectionKind::Skills) {
        column = column.child(titled(SectionKind::Skills).children(view.skills.iter().map(|skill| {
            Node::el("div")
                .class("skill-group")
                .maybe_child(skill.name.as_ref().map(|n| Node::el("h3").with_text(format!("{n}:"))))
                .maybe_child(chips(&skill.keywords))
        })));
    }

    if view.has(SectionKind::Languages) {
        column = column.child(titled(SectionKind::Languages).children(view.languages.iter().map(|l| {
            Node::el("div")
                .class("contact-line")
                .with_text(l.language.as_str())
                .maybe_child(l.fluency.as_ref().map(|f| Node::el("span").class("muted").with_text(format!(" ({f})"))))
        })));
    }

    column
}

pub fn layout(view: &ResumeView, options: &RenderOptions) -> Node {
    let footer = view.additional_information.as_ref().map(|info| {
        titled(SectionKind::AdditionalInformation).child(Node::el("p").class("pre-line").with_text(info.as_str()))
    });

    Node::el("div")
        .class("resume template-rickosborne")
        .attr("data-template", "rickosborne")
        .child(
            Node::el("div")
                .class("grid-3")
                .child(main_column(view, options))
                .child(side_column(view, options)),
        )
        .maybe_child(footer)
}
