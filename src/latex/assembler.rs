use chrono::Local;

use crate::chat::tailor::{TailoredCoverLetter, TailoredResume};
use crate::models::job::Job;
use crate::models::resume::{PersonalInformation, Resume};
use crate::utils::misc::strip_url;

static RESUME_TEMPLATE: &str = include_str!("resume.tex");
static COVER_LETTER_TEMPLATE: &str = include_str!("cover_letter.tex");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeItem {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub items: Vec<String>,
}

pub struct LatexAssembler<'a> {
    personal: PersonalInformation,
    resume: &'a Resume,
}

impl<'a> LatexAssembler<'a> {
    pub fn new(resume: &'a Resume) -> Self {
        Self {
            personal: resume.personal_information.clone().unwrap_or_default(),
            resume,
        }
    }

    pub fn resume(&self, content: &TailoredResume) -> String {
        let (skills, experience, projects, education) = tailored_to_resume_items(content);

        RESUME_TEMPLATE
            .replace("<<NAME>>", &Self::escape_latex(&self.personal.full_name()))
            .replace("<<LOCATION>>", &Self::escape_latex(&self.location()))
            .replace("<<HEADER>>", &self.header())
            .replace("<<SUMMARY>>", &Self::escape_latex(&content.summary))
            .replace("<<EDUCATION>>", &Self::items(&education))
            .replace("<<SKILLS>>", &Self::items(&[skills]))
            .replace("<<EXPERIENCE>>", &Self::items(&experience))
            .replace("<<PROJECTS>>", &Self::items(&projects))
            .replace("<<LANGUAGES>>", &self.languages())
    }

    pub fn cover_letter(&self, content: &TailoredCoverLetter, job: &Job) -> String {
        let body = content
            .paragraphs
            .iter()
            .map(|paragraph| Self::escape_latex(paragraph))
            .collect::<Vec<_>>()
            .join("\n\n");

        COVER_LETTER_TEMPLATE
            .replace("<<NAME>>", &Self::escape_latex(&self.personal.full_name()))
            .replace("<<LOCATION>>", &Self::escape_latex(&self.location()))
            .replace("<<HEADER>>", &self.header())
            .replace("<<DATE>>", &Local::now().format("%B %-d, %Y").to_string())
            .replace("<<COMPANY>>", &Self::escape_latex(&job.company))
            .replace("<<ROLE>>", &Self::escape_latex(&job.role))
            .replace("<<GREETING>>", &Self::escape_latex(&content.greeting))
            .replace("<<BODY>>", &body)
            .replace("<<CLOSING>>", &Self::escape_latex(&content.closing))
    }

    fn location(&self) -> String {
        [self.personal.city.as_deref(), self.personal.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(&self) -> String {
        let mut header = String::new();

        if let Some(email) = &self.personal.email {
            header.push_str(&format!(
                "\\ $|$ \\ \\href{{mailto:{}}}{{{}}} ",
                email, email
            ));
        }

        if let Some(phone) = &self.personal.phone {
            let prefix = self.personal.phone_prefix.as_deref().unwrap_or_default();
            header.push_str(&format!(
                "\\ $|$ \\ {}{} ",
                Self::escape_latex(prefix),
                Self::escape_latex(phone)
            ));
        }

        if let Some(linkedin) = &self.personal.linkedin {
            header.push_str(&format!(
                "\\ $|$ \\ \\href{{{}}}{{{}}} ",
                linkedin,
                Self::escape_latex(&strip_url(linkedin))
            ));
        }

        if let Some(github) = &self.personal.github {
            header.push_str(&format!(
                "\\ $|$ \\ \\href{{{}}}{{{}}} ",
                github,
                Self::escape_latex(&strip_url(github))
            ));
        }

        header
    }

    fn languages(&self) -> String {
        let languages = self
            .resume
            .languages
            .iter()
            .flatten()
            .filter_map(|language| {
                let name = language.language.as_deref()?;
                Some(match language.proficiency.as_deref() {
                    Some(level) => format!("{} ({})", name, level),
                    None => name.to_string(),
                })
            })
            .collect::<Vec<_>>();

        if languages.is_empty() {
            return String::new();
        }

        Self::items(&[ResumeItem {
            items: vec![languages.join(", ")],
            ..ResumeItem::default()
        }])
    }

    fn item(item: &ResumeItem) -> String {
        let mut out = String::new();

        if let Some(title) = &item.title {
            let mut title = format!("\\noindent \\textbf{{{}}}", Self::escape_latex(title));

            if let Some(location) = &item.location {
                match &item.link {
                    Some(link) => {
                        title.push_str(&format!(
                            " \\hfill \\href{{{}}}{{{}}}",
                            link,
                            Self::escape_latex(location)
                        ));
                    }
                    None => {
                        title.push_str(&format!(" \\hfill {}", Self::escape_latex(location)));
                    }
                }
            }

            if item.description.is_some() {
                title.push_str(" \\\\");
            }

            out.push_str(&title);
            out.push('\n');
        }

        if let Some(description) = &item.description {
            let mut description = format!("\\textit{{{}}}", Self::escape_latex(description));

            if let Some(date) = &item.date {
                description.push_str(&format!(" \\hfill {} ", Self::escape_latex(date)));
            }

            out.push_str(&description);
            out.push('\n');
        }

        if !item.items.is_empty() {
            out.push_str("\\begin{itemize}[noitemsep,topsep=0pt,leftmargin=*]\n");
            for bullet in &item.items {
                out.push_str(&format!("    \\item {}\n", Self::escape_latex(bullet)));
            }
            out.push_str("\\end{itemize}\n");
        }

        out
    }

    fn items(items: &[ResumeItem]) -> String {
        items
            .iter()
            .map(Self::item)
            .collect::<Vec<String>>()
            .join("\n")
    }

    /// Escapes LaTeX specials, turning `**bold**` and `` `code` `` into markup.
    pub fn escape_latex(text: &str) -> String {
        let mut result = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '*' && chars.peek() == Some(&'*') {
                chars.next();
                let mut bold_text = String::new();
                let mut found_end = false;

                while let Some(bc) = chars.next() {
                    if bc == '*' && chars.peek() == Some(&'*') {
                        chars.next();
                        found_end = true;
                        break;
                    }
                    bold_text.push(bc);
                }

                if found_end {
                    result.push_str(&format!("\\textbf{{{}}}", Self::escape_latex(&bold_text)));
                } else {
                    result.push_str("**");
                    result.push_str(&Self::escape_latex(&bold_text));
                }
            } else if c == '`' {
                let mut code_text = String::new();
                let mut found_end = false;

                for bc in chars.by_ref() {
                    if bc == '`' {
                        found_end = true;
                        break;
                    }
                    code_text.push(bc);
                }

                if found_end {
                    result.push_str(&format!("\\texttt{{{}}}", Self::escape_latex(&code_text)));
                } else {
                    result.push('`');
                    result.push_str(&Self::escape_latex(&code_text));
                }
            } else {
                match c {
                    '&' => result.push_str("\\&"),
                    '%' => result.push_str("\\%"),
                    '$' => result.push_str("\\$"),
                    '#' => result.push_str("\\#"),
                    '_' => result.push_str("\\_"),
                    '{' => result.push_str("\\{"),
                    '}' => result.push_str("\\}"),
                    '^' => result.push_str("\\textasciicircum{}"),
                    '~' => result.push_str("\\textasciitilde{}"),
                    '\\' => result.push_str("\\textbackslash{}"),
                    _ => result.push(c),
                }
            }
        }

        result
    }
}

/// Splits the model output into the sections the template expects:
/// (skills, experience, projects, education).
pub fn tailored_to_resume_items(
    content: &TailoredResume,
) -> (ResumeItem, Vec<ResumeItem>, Vec<ResumeItem>, Vec<ResumeItem>) {
    let skills = ResumeItem {
        items: content
            .skills_by_category
            .iter()
            .map(|cat| format!("**{}**: {}", cat.category, cat.items.join(", ")))
            .collect(),
        ..ResumeItem::default()
    };

    let experience = content
        .experience
        .iter()
        .map(|exp| ResumeItem {
            title: Some(exp.company.clone()),
            date: Some(exp.date.clone()),
            location: Some(exp.location.clone()),
            description: Some(exp.position.clone()),
            link: None,
            items: exp.accomplishments.clone(),
        })
        .collect();

    let projects = content
        .projects
        .iter()
        .map(|proj| ResumeItem {
            title: Some(proj.title.clone()),
            date: None,
            location: proj.link.as_ref().map(|link| strip_url(link)),
            description: None,
            link: proj.link.clone(),
            items: proj.items.clone(),
        })
        .collect();

    let education = content
        .education
        .iter()
        .map(|edu| ResumeItem {
            title: Some(edu.institution.clone()),
            date: Some(edu.date.clone()),
            location: Some(edu.location.clone()),
            description: Some(edu.degree.clone()),
            link: None,
            items: edu.accomplishments.clone(),
        })
        .collect();

    (skills, experience, projects, education)
}
