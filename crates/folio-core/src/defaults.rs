//! Built-in default portfolio content.
//!
//! Used by the client before the first fetch completes, when a fetch fails,
//! as the base that fetched sections are merged over, and by "reset to
//! defaults". It never carries an admin credential override.

use crate::document::{
    About, Education, Experience, ItemId, Personal, PortfolioDocument, Project, Service, Skill,
    SkillCategory, Social, Stat,
};

fn text(s: &str) -> Option<String> {
    Some(s.to_owned())
}

fn texts(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| (*s).to_owned()).collect())
}

fn skill(name: &str, level: u8) -> Skill {
    Skill {
        name: text(name),
        level: Some(level.into()),
        ..Skill::default()
    }
}

fn stat(label: &str, value: &str) -> Stat {
    Stat {
        label: text(label),
        value: text(value),
        ..Stat::default()
    }
}

fn service(id: i64, title: &str, description: &str, icon: &str) -> Service {
    Service {
        id: Some(ItemId::Number(id)),
        title: text(title),
        description: text(description),
        icon: text(icon),
        ..Service::default()
    }
}

/// The built-in default document.
#[must_use]
pub fn default_document() -> PortfolioDocument {
    PortfolioDocument {
        personal: Some(Personal {
            name: text("Your Name"),
            title: text("Software Developer"),
            subtitle: text("Builder of useful things"),
            bio: text("A short introduction about who you are and what you work on."),
            avatar: text(""),
            resume: text("#"),
            location: text(""),
            university: text(""),
            department: text(""),
            email: text("you@example.com"),
            phone: text(""),
            ..Personal::default()
        }),
        social: Some(Social {
            github: text(""),
            linkedin: text(""),
            facebook: text(""),
            instagram: text(""),
            twitter: text(""),
            website: text(""),
            ..Social::default()
        }),
        about: Some(About {
            description: text("Tell visitors about your background, interests and goals."),
            highlights: texts(&[
                "Currently building web and mobile applications",
                "Open to collaborations",
            ]),
            stats: Some(vec![
                stat("Projects Completed", "0+"),
                stat("Technologies", "0+"),
            ]),
            ..About::default()
        }),
        skills: Some(vec![SkillCategory {
            category: text("Programming Languages"),
            items: Some(vec![skill("Rust", 80), skill("TypeScript", 75)]),
            ..SkillCategory::default()
        }]),
        projects: Some(vec![Project {
            id: Some(ItemId::Number(1)),
            title: text("Sample Project"),
            description: text("Describe a project you are proud of."),
            image: text(""),
            tags: texts(&["Rust"]),
            github: text(""),
            live: text(""),
            featured: Some(true),
            ..Project::default()
        }]),
        education: Some(vec![Education {
            id: Some(ItemId::Number(1)),
            degree: text("B.Sc. in Computer Science"),
            institution: text("Your University"),
            duration: text(""),
            description: text(""),
            achievements: Some(Vec::new()),
            ..Education::default()
        }]),
        experience: Some(vec![Experience {
            id: Some(ItemId::Number(1)),
            role: text("Developer"),
            company: text(""),
            duration: text(""),
            description: text(""),
            responsibilities: Some(Vec::new()),
            ..Experience::default()
        }]),
        services: Some(vec![
            service(1, "Web Development", "Responsive, modern web applications.", "web"),
            service(2, "Backend Development", "APIs and data services.", "backend"),
        ]),
        custom_sections: Some(Vec::new()),
        admin_password: None,
        web3forms_key: text(""),
        extra: folio_storage::JsonObject::new(),
    }
}
