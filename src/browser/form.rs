// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Form extraction, filling and submission

use reqwest::Method;
use url::form_urlencoded;
use url::Url;

use super::browser::Browser;
use crate::dom::Element;
use crate::error::{Error, Result};

/// Content type of encoded submissions
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Kind of a successful control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any free-form input (text, hidden, password, email, ...)
    Text,
    Textarea,
    Radio,
    Checkbox,
    Select,
    SelectMultiple,
}

impl FieldKind {
    /// Whether the value must be one of the declared options
    fn has_options(&self) -> bool {
        !matches!(self, FieldKind::Text | FieldKind::Textarea)
    }

    /// Whether several values may be selected at once
    fn multi_valued(&self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::SelectMultiple)
    }
}

/// One named field. Same-named radio buttons and checkboxes share a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub kind: FieldKind,
    /// Values submitted, in order
    pub values: Vec<String>,
    /// Declared choices for radio, checkbox and select fields
    pub options: Vec<String>,
}

impl FormField {
    fn new(name: String, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            values: Vec::new(),
            options: Vec::new(),
        }
    }

    /// First submitted value
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    fn require_option(&self, value: &str) -> Result<()> {
        if self.kind.has_options() && !self.options.iter().any(|o| o == value) {
            return Err(Error::not_found(
                "Form option",
                format!("{}={}", self.name, value),
            ));
        }
        Ok(())
    }
}

/// A named submit control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub name: String,
    pub value: String,
}

/// Snapshot of a form's method, action, fields and submit controls
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Raw action attribute, empty when absent
    pub action: String,
    pub method: Method,
    pub enctype: String,
    /// Fields in declaration order
    pub fields: Vec<FormField>,
    /// Submit controls in declaration order
    pub buttons: Vec<SubmitButton>,
}

impl FormFields {
    /// Read a `<form>` element
    pub fn from_element(form: &Element) -> Result<Self> {
        let mut this = Self {
            id: form.id(),
            name: form.get_attribute("name"),
            action: form.get_attribute("action").unwrap_or_default().trim().to_string(),
            method: if form.attr_or_empty("method").eq_ignore_ascii_case("post") {
                Method::POST
            } else {
                Method::GET
            },
            enctype: form
                .get_attribute("enctype")
                .unwrap_or_else(|| FORM_URLENCODED.to_string()),
            fields: Vec::new(),
            buttons: Vec::new(),
        };

        for control in form.query_selector_all("input, button, select, textarea")? {
            if control.disabled() {
                continue;
            }
            this.add_control(&control);
        }

        Ok(this)
    }

    fn add_control(&mut self, control: &Element) {
        if let Some(button) = submit_button(control) {
            if !button.name.is_empty() {
                self.buttons.push(button);
            }
            return;
        }

        let name = control.attr_or_empty("name");
        if name.is_empty() {
            return;
        }

        match control.local_name() {
            "textarea" => {
                let mut field = FormField::new(name, FieldKind::Textarea);
                field.values.push(control.text_content());
                self.fields.push(field);
            }
            "select" => self.fields.push(select_field(name, control)),
            "input" => {
                let input_type = control.attr_or_empty("type").to_ascii_lowercase();
                match input_type.as_str() {
                    "radio" | "checkbox" => {
                        let kind = if input_type == "radio" {
                            FieldKind::Radio
                        } else {
                            FieldKind::Checkbox
                        };
                        let value = control
                            .get_attribute("value")
                            .unwrap_or_else(|| "on".to_string());
                        let field = self.group(name, kind);
                        field.options.push(value.clone());
                        if control.checked() {
                            if kind == FieldKind::Radio {
                                field.values.clear();
                            }
                            field.values.push(value);
                        }
                    }
                    "reset" | "button" | "file" | "image" => {}
                    _ => {
                        let mut field = FormField::new(name, FieldKind::Text);
                        field.values.push(control.attr_or_empty("value"));
                        self.fields.push(field);
                    }
                }
            }
            _ => {}
        }
    }

    /// Field shared by same-named radios or checkboxes
    fn group(&mut self, name: String, kind: FieldKind) -> &mut FormField {
        let idx = match self
            .fields
            .iter()
            .position(|f| f.name == name && f.kind == kind)
        {
            Some(idx) => idx,
            None => {
                self.fields.push(FormField::new(name, kind));
                self.fields.len() - 1
            }
        };
        &mut self.fields[idx]
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut FormField> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::not_found("Form field", name))
    }

    /// First value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FormField::value)
    }

    /// Set a field to a single value, replacing what it had
    pub fn input(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.field_mut(name)?;
        field.require_option(value)?;
        field.values = vec![value.to_string()];

        // Later same-named free-form fields stop contributing
        let mut seen = false;
        for f in self.fields.iter_mut().filter(|f| f.name == name) {
            if seen {
                f.values.clear();
            }
            seen = true;
        }
        Ok(())
    }

    /// Add `value` to a checkbox group or multiple select
    pub fn check(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.field_mut(name)?;
        field.require_option(value)?;
        if !field.kind.multi_valued() {
            field.values.clear();
        }
        if !field.values.iter().any(|v| v == value) {
            field.values.push(value.to_string());
        }
        Ok(())
    }

    /// Remove `value` from a field
    pub fn uncheck(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.field_mut(name)?;
        field.require_option(value)?;
        field.values.retain(|v| v != value);
        Ok(())
    }

    /// First submit control named `name`
    pub fn button(&self, name: &str) -> Option<&SubmitButton> {
        self.buttons.iter().find(|b| b.name == name)
    }

    /// Submit control named `name` with value `value`
    pub fn button_by_value(&self, name: &str, value: &str) -> Option<&SubmitButton> {
        self.buttons
            .iter()
            .find(|b| b.name == name && b.value == value)
    }

    /// URL-encode every field value, then the clicked control's pair
    pub fn encode(&self, clicked: Option<&SubmitButton>) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            for value in &field.values {
                serializer.append_pair(&field.name, value);
            }
        }
        if let Some(button) = clicked {
            serializer.append_pair(&button.name, &button.value);
        }
        serializer.finish()
    }

    /// Resolve the action: relative to `base`, or `current` when empty
    pub fn action_url(&self, base: &Url, current: &Url) -> Result<Url> {
        if self.action.is_empty() {
            return Ok(current.clone());
        }
        Ok(base.join(&self.action)?)
    }

    /// Method, target URL and body for submitting with `clicked`
    pub(crate) fn submission(
        &self,
        base: &Url,
        current: &Url,
        clicked: Option<&SubmitButton>,
    ) -> Result<Submission> {
        let mut url = self.action_url(base, current)?;
        let encoded = self.encode(clicked);

        if self.method == Method::POST {
            return Ok(Submission {
                method: Method::POST,
                url,
                body: Some(encoded),
            });
        }

        url.set_fragment(None);
        url.set_query(if encoded.is_empty() {
            None
        } else {
            Some(&encoded)
        });
        Ok(Submission {
            method: Method::GET,
            url,
            body: None,
        })
    }
}

/// Request a form submission turns into
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Submission {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
}

/// Submit control described by `control`, if it is one
pub(crate) fn submit_button(control: &Element) -> Option<SubmitButton> {
    let is_submit = match control.local_name() {
        "input" => control.attr_or_empty("type").eq_ignore_ascii_case("submit"),
        "button" => {
            let button_type = control.attr_or_empty("type");
            button_type.is_empty() || button_type.eq_ignore_ascii_case("submit")
        }
        _ => false,
    };
    is_submit.then(|| SubmitButton {
        name: control.attr_or_empty("name"),
        value: control.attr_or_empty("value"),
    })
}

fn select_field(name: String, select: &Element) -> FormField {
    let kind = if select.has_attribute("multiple") {
        FieldKind::SelectMultiple
    } else {
        FieldKind::Select
    };
    let mut field = FormField::new(name, kind);

    for option in select.query_selector_all("option").unwrap_or_default() {
        if option.disabled() {
            continue;
        }
        let value = option
            .get_attribute("value")
            .unwrap_or_else(|| option.text_content().trim().to_string());
        if option.has_attribute("selected") {
            if kind == FieldKind::Select {
                field.values.clear();
            }
            field.values.push(value.clone());
        }
        field.options.push(value);
    }

    if kind == FieldKind::Select && field.values.is_empty() {
        if let Some(first) = field.options.first() {
            field.values.push(first.clone());
        }
    }
    field
}

/// A form on the current page, ready to be filled in and submitted.
///
/// Holds the browser mutably, so the page cannot change underneath it.
/// Submitting consumes the form.
pub struct Form<'b> {
    browser: &'b mut Browser,
    element: Element,
    fields: FormFields,
}

impl<'b> Form<'b> {
    pub(crate) fn new(browser: &'b mut Browser, element: Element) -> Result<Self> {
        let fields = FormFields::from_element(&element)?;
        Ok(Self {
            browser,
            element,
            fields,
        })
    }

    /// The `<form>` element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Current field values
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn method(&self) -> &Method {
        &self.fields.method
    }

    /// Resolved action URL
    pub fn action(&self) -> Result<Url> {
        let state = self.browser.state()?;
        self.fields.action_url(&state.base_url(), &state.url)
    }

    /// First value of a field
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.value(name)
    }

    /// Set a field's value. Radio and select values must be declared options.
    pub fn input(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.fields.input(name, value)?;
        Ok(self)
    }

    /// Check a checkbox (or select an option of a multiple select)
    pub fn check(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.fields.check(name, value)?;
        Ok(self)
    }

    /// Uncheck a checkbox
    pub fn uncheck(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.fields.uncheck(name, value)?;
        Ok(self)
    }

    /// Submit with the first submit control named `name`
    pub async fn click(self, name: &str) -> Result<()> {
        let button = self
            .fields
            .button(name)
            .cloned()
            .ok_or_else(|| Error::not_found("Submit button", name))?;
        self.send(Some(button)).await
    }

    /// Submit with the submit control named `name` whose value is `value`
    pub async fn click_by_value(self, name: &str, value: &str) -> Result<()> {
        let button = self
            .fields
            .button_by_value(name, value)
            .cloned()
            .ok_or_else(|| Error::not_found("Submit button", format!("{}={}", name, value)))?;
        self.send(Some(button)).await
    }

    /// Submit without any submit control pair
    pub async fn submit(self) -> Result<()> {
        self.send(None).await
    }

    async fn send(self, clicked: Option<SubmitButton>) -> Result<()> {
        self.browser.submit_form(&self.fields, clicked.as_ref()).await
    }
}

impl std::fmt::Debug for Form<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form").field("fields", &self.fields).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const FORM: &str = r#"
        <form method="post" action="/" name="default">
            <input type="text" name="age" value="" />
            <input type="radio" name="gender" value="male" />
            <input type="radio" name="gender" value="female" />
            <input type="submit" name="submit1" value="submitted1" />
            <input type="submit" name="submit2" value="submitted2" />
        </form>
    "#;

    fn fields(html: &str) -> FormFields {
        let doc = parse_html(html).unwrap();
        let form = doc.query_selector("form").unwrap().unwrap();
        FormFields::from_element(&form).unwrap()
    }

    #[test]
    fn test_form_extraction() {
        let form = fields(FORM);
        assert_eq!(form.method, Method::POST);
        assert_eq!(form.name.as_deref(), Some("default"));
        assert_eq!(form.fields.len(), 2);
        assert_eq!(form.fields[1].kind, FieldKind::Radio);
        assert_eq!(form.fields[1].options, vec!["male", "female"]);
        assert!(form.fields[1].values.is_empty());
        assert_eq!(form.buttons.len(), 2);
    }

    #[test]
    fn test_encode_only_clicked_button() {
        let mut form = fields(FORM);
        form.input("age", "55").unwrap();
        form.input("gender", "male").unwrap();

        let encoded = form.encode(form.button("submit2"));
        assert_eq!(encoded, "age=55&gender=male&submit2=submitted2");
        assert!(!encoded.contains("submit1"));
    }

    #[test]
    fn test_input_validation() {
        let mut form = fields(FORM);
        assert!(form.input("missing", "x").unwrap_err().is_not_found());
        assert!(form.input("gender", "other").unwrap_err().is_not_found());
        form.input("gender", "female").unwrap();
        form.input("gender", "male").unwrap();
        assert_eq!(form.field("gender").unwrap().values, vec!["male"]);
    }

    #[test]
    fn test_defaults() {
        let form = fields(
            r#"<form>
                <input name="q" value="rust">
                <input type="hidden" name="token" value="abc">
                <input type="checkbox" name="remember" checked>
                <input type="checkbox" name="tags" value="a" checked>
                <input type="checkbox" name="tags" value="b">
                <input type="checkbox" name="tags" value="c" checked>
                <select name="lang"><option>en</option><option value="fi">Suomi</option></select>
                <select name="size"><option>S</option><option selected>M</option></select>
                <textarea name="bio">hello there</textarea>
                <input name="off" value="x" disabled>
                <input value="unnamed">
                <input type="reset" name="reset">
                <input type="file" name="upload">
                <button>Go</button>
            </form>"#,
        );

        assert_eq!(form.method, Method::GET);
        assert_eq!(
            form.encode(None),
            "q=rust&token=abc&remember=on&tags=a&tags=c&lang=en&size=M&bio=hello+there"
        );
        assert!(form.field("off").is_none());
        assert!(form.field("upload").is_none());
        assert!(form.buttons.is_empty());
    }

    #[test]
    fn test_check_uncheck() {
        let mut form = fields(
            r#"<form>
                <input type="checkbox" name="tags" value="a">
                <input type="checkbox" name="tags" value="b">
            </form>"#,
        );
        form.check("tags", "b").unwrap();
        form.check("tags", "a").unwrap();
        form.check("tags", "a").unwrap();
        assert_eq!(form.encode(None), "tags=b&tags=a");

        form.uncheck("tags", "b").unwrap();
        assert_eq!(form.encode(None), "tags=a");
        assert!(form.check("tags", "z").unwrap_err().is_not_found());
    }

    #[test]
    fn test_button_by_value() {
        let form = fields(
            r#"<form>
                <input type="submit" name="submit" value="submitted1">
                <input type="submit" name="submit" value="submitted2">
            </form>"#,
        );
        let button = form.button_by_value("submit", "submitted2").unwrap();
        assert_eq!(button.value, "submitted2");
        assert!(form.button_by_value("submit", "nope").is_none());
    }

    #[test]
    fn test_get_submission_replaces_query() {
        let mut form = fields(
            r#"<form action="search?old=1#top"><input name="q"></form>"#,
        );
        form.input("q", "a b").unwrap();
        let base = Url::parse("http://example.com/dir/page").unwrap();

        let submission = form.submission(&base, &base, None).unwrap();
        assert_eq!(submission.method, Method::GET);
        assert_eq!(submission.url.as_str(), "http://example.com/dir/search?q=a+b");
        assert!(submission.body.is_none());
    }

    #[test]
    fn test_empty_action_uses_current_url() {
        let form = fields(r#"<form method="POST"><input name="a" value="1"></form>"#);
        let base = Url::parse("http://cdn.example.com/").unwrap();
        let current = Url::parse("http://example.com/login?next=home").unwrap();

        let submission = form.submission(&base, &current, None).unwrap();
        assert_eq!(submission.method, Method::POST);
        assert_eq!(submission.url, current);
        assert_eq!(submission.body.as_deref(), Some("a=1"));
    }
}
