//! Language-neutral outline generator
//!
//! Renders every class with its synthesized method bodies as an indented
//! pseudo-code file. Useful to review synthesis results and as a stable
//! golden output for tests.

use std::collections::HashMap;

use anyhow::Result;

use sdkgen_dom::{CodeTree, Element, TypeReference};

use crate::conventions::{Conventions, DefaultConventions};
use crate::generators::{Generator, GeneratorConfig};
use crate::synthesis::{
    Arm, Binding, ClassSynthesis, Guard, Instruction, Operand, PropertyAccess, TreeSynthesis,
};

const INDENT: &str = "  ";

/// Output of the outline generator
#[derive(Debug)]
pub struct OutlineOutput {
    /// File contents indexed by file name
    pub modules: HashMap<String, String>,
}

pub struct OutlineGenerator<C = DefaultConventions> {
    config: GeneratorConfig,
    conventions: C,
}

impl OutlineGenerator<DefaultConventions> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_conventions(config, DefaultConventions)
    }

    pub fn new_default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl<C: Conventions> OutlineGenerator<C> {
    pub fn with_conventions(config: GeneratorConfig, conventions: C) -> Self {
        Self {
            config,
            conventions,
        }
    }
}

impl<C: Conventions> Generator for OutlineGenerator<C> {
    type Output = OutlineOutput;

    fn generate(&self, tree: &CodeTree, synthesis: &TreeSynthesis) -> Result<Self::Output> {
        let mut modules = HashMap::new();
        for class in &synthesis.classes {
            let qualified = tree.qualified_name(class.class);
            let file_name = self.conventions.file_name(&qualified);
            modules.insert(file_name, self.render_class(tree, class));
        }
        Ok(OutlineOutput { modules })
    }
}

impl<C: Conventions> OutlineGenerator<C> {
    /// Render one class and its method bodies
    pub fn render_class(&self, tree: &CodeTree, class: &ClassSynthesis) -> String {
        let element = &tree[class.class];
        let mut code = String::new();

        code.push_str(&format!("// {} ({:?})\n", tree.qualified_name(class.class), class.resolution.strategy));
        self.push_docs(&mut code, element, 0);

        let mut header = format!("class {}", self.conventions.type_name(element.name()));
        if let Some(base) = element.as_class().and_then(|c| c.base_type.as_ref()) {
            header.push_str(&format!(" : {}", self.conventions.type_name(base.name())));
        }
        if let Some(data) = element.as_class() {
            let contracts: Vec<String> = data
                .implements
                .iter()
                .map(|c| self.conventions.type_name(c.name()))
                .collect();
            if !contracts.is_empty() {
                header.push_str(&format!(" implements {}", contracts.join(", ")));
            }
        }
        code.push_str(&header);
        code.push('\n');

        for property in tree.properties(class.class) {
            self.push_docs(&mut code, property, 1);
            if let Some(data) = property.as_property() {
                code.push_str(&format!(
                    "{INDENT}{}: {} <- \"{}\"",
                    self.conventions.member_name(property.name()),
                    self.render_type(&data.type_ref),
                    data.wire_name
                ));
                if let Some(default) = &data.default_value {
                    code.push_str(&format!(" = {default}"));
                }
                code.push('\n');
            }
        }

        for program in &class.programs {
            code.push('\n');
            self.push_docs(&mut code, &tree[program.method], 1);
            code.push_str(&format!(
                "{INDENT}fn {} [{:?}]\n",
                self.conventions.member_name(&program.name),
                program.kind
            ));
            for instruction in &program.body {
                self.render_instruction(&mut code, instruction, 2);
            }
        }

        for failure in &class.failures {
            code.push_str(&format!("\n{INDENT}// skipped {}: {}\n", failure.element, failure.error));
        }
        code
    }

    fn push_docs(&self, code: &mut String, element: &Element, depth: usize) {
        if !self.config.generate_docs {
            return;
        }
        let pad = INDENT.repeat(depth);
        if let Some(description) = &element.documentation.description {
            for line in description.lines() {
                code.push_str(&format!("{pad}/// {line}\n"));
            }
        }
        if let Some(deprecation) = &element.deprecation {
            code.push_str(&format!(
                "{pad}/// deprecated{}\n",
                deprecation
                    .message
                    .as_deref()
                    .map(|m| format!(": {m}"))
                    .unwrap_or_default()
            ));
        }
    }

    fn render_type(&self, type_ref: &TypeReference) -> String {
        let base = if type_ref.is_primitive() {
            self.conventions.primitive_token(type_ref.name())
        } else {
            self.conventions.type_name(type_ref.name())
        };
        let base = if type_ref.is_collection() {
            format!("[{base}]")
        } else {
            base
        };
        if type_ref.is_nullable {
            self.conventions.nullable(&base)
        } else {
            base
        }
    }

    fn member(&self, name: &str) -> String {
        self.conventions.member_name(name)
    }

    fn render_operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Result => "result".to_string(),
            Operand::FieldMap => "fields".to_string(),
            Operand::EmptyFieldMap => "{}".to_string(),
            Operand::RequestInfo => "request_info".to_string(),
            Operand::Parameter(name) => self.conventions.member_name(name),
            Operand::Literal(value) => format!("{value:?}"),
        }
    }

    fn render_guard(&self, guard: &Guard) -> String {
        match guard {
            Guard::DiscriminatorEquals { key } => format!("discriminator == {key:?}"),
            Guard::ValuePresent { shape } => format!("node.{}() is present", self.conventions.read_call(shape)),
            Guard::PropertyPopulated { property } => {
                format!("self.{} is set", self.conventions.member_name(property))
            }
            Guard::AnyPopulated { properties } => {
                let names: Vec<String> = properties
                    .iter()
                    .map(|p| format!("self.{}", self.conventions.member_name(p)))
                    .collect();
                format!("any set({})", names.join(", "))
            }
        }
    }

    fn render_arms(&self, code: &mut String, arms: &[Arm], otherwise: &[Instruction], depth: usize) {
        let pad = INDENT.repeat(depth);
        for (index, arm) in arms.iter().enumerate() {
            let keyword = if index == 0 { "if" } else { "else if" };
            code.push_str(&format!("{pad}{keyword} {}\n", self.render_guard(&arm.guard)));
            for instruction in &arm.body {
                self.render_instruction(code, instruction, depth + 1);
            }
        }
        if !otherwise.is_empty() {
            code.push_str(&format!("{pad}else\n"));
            for instruction in otherwise {
                self.render_instruction(code, instruction, depth + 1);
            }
        }
    }

    fn render_instruction(&self, code: &mut String, instruction: &Instruction, depth: usize) {
        if let Instruction::Branch { arms, otherwise } = instruction {
            self.render_arms(code, arms, otherwise, depth);
            return;
        }
        let line = match instruction {
            Instruction::ReadDiscriminator { property } => {
                format!("discriminator = node.child({property:?}).get_str_value()")
            }
            Instruction::Construct {
                type_name, bind, ..
            } => {
                let value = format!("new {}()", self.conventions.type_name(type_name));
                match bind {
                    Binding::Return => format!("return {value}"),
                    Binding::Result => format!("result = {value}"),
                    Binding::Slot(property) => format!("result.{} = {value}", self.member(property)),
                }
            }
            Instruction::AssignReadValue { property } => {
                format!("result.{} = value", self.member(property))
            }
            Instruction::FieldMapEntry {
                wire_name,
                property,
                shape,
            } => format!(
                "fields[{wire_name:?}] = n => self.{} = n.{}()",
                self.member(property),
                self.conventions.read_call(shape)
            ),
            Instruction::DelegateToBase => "super()".to_string(),
            Instruction::DelegateToMember { property } => {
                format!("return self.{}.fields()", self.member(property))
            }
            Instruction::MergeFacets { properties } => {
                let facets: Vec<String> = properties.iter().map(|p| format!("self.{}", self.member(p))).collect();
                format!("return merge_fields({})", facets.join(", "))
            }
            Instruction::WriteValue {
                wire_name,
                properties,
                shape,
            } => {
                let key = wire_name
                    .as_deref()
                    .map(|w| format!("{w:?}"))
                    .unwrap_or_else(|| "none".to_string());
                let values: Vec<String> = properties.iter().map(|p| format!("self.{}", self.member(p))).collect();
                format!("writer.{}({key}, {})", self.conventions.write_call(shape), values.join(", "))
            }
            Instruction::WriteAdditionalData { property } => {
                format!("writer.write_additional_data_value(self.{})", self.member(property))
            }
            Instruction::CallBaseConstructor { arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| self.render_operand(a)).collect();
                format!("super({})", args.join(", "))
            }
            Instruction::InitializeProperty {
                property,
                access,
                default,
            } => {
                let value = default.clone().unwrap_or_else(|| "none".to_string());
                match access {
                    PropertyAccess::Direct => format!("self.{} = {value}", self.member(property)),
                    PropertyAccess::Setter => format!("self.set_{}({value})", self.member(property)),
                }
            }
            Instruction::MergePathParameters { parameter, segments } => {
                let mut line = format!("url_params = copy({})", self.member(parameter));
                for segment in segments {
                    line.push_str(&format!(
                        "; url_params[{:?}] = {}",
                        segment.serialization_name,
                        self.member(&segment.parameter)
                    ));
                }
                line
            }
            Instruction::AssignFromParameter { property, .. } => {
                format!("self.{} = url_params", self.member(property))
            }
            Instruction::BindRawUrl { parameter, property } => format!(
                "self.{} = {{\"request-raw-url\": {}}}",
                self.member(property),
                self.member(parameter)
            ),
            Instruction::RegisterDefaultSerializer { module } => {
                format!("register_default_serializer({module})")
            }
            Instruction::RegisterDefaultDeserializer { module } => {
                format!("register_default_deserializer({module})")
            }
            Instruction::SetBaseUrl {
                adapter,
                url,
                path_parameters,
            } => {
                let mut line = format!("self.{}.base_url = {url:?}", self.member(adapter));
                if let Some(path_parameters) = path_parameters {
                    line.push_str(&format!("; self.{}[\"baseurl\"] = {url:?}", self.member(path_parameters)));
                }
                line
            }
            Instruction::EnableBackingStore { adapter, parameter } => format!(
                "self.{}.enable_backing_store({})",
                self.member(adapter),
                self.member(parameter)
            ),
            Instruction::NewRequestInfo => "request_info = RequestInformation()".to_string(),
            Instruction::SetUrlTemplate {
                url_template,
                path_parameters,
            } => format!(
                "request_info.url_template = self.{}; request_info.path_parameters = self.{}",
                self.member(url_template),
                self.member(path_parameters)
            ),
            Instruction::SetHttpMethod { method } => {
                format!("request_info.http_method = {}", method.as_str())
            }
            Instruction::SetAcceptHeader { value } => {
                format!("request_info.headers.try_add(\"Accept\", {value:?})")
            }
            Instruction::ApplyRequestConfiguration {
                parameter,
                headers,
                query_parameters,
                options,
            } => {
                let config = self.member(parameter);
                let mut line = format!(
                    "if {config}: request_info.headers.add_all({config}.{}); request_info.add_request_options({config}.{})",
                    self.member(headers),
                    self.member(options)
                );
                if let Some(query) = query_parameters {
                    line.push_str(&format!(
                        "; request_info.set_query_string_parameters({config}.{})",
                        self.member(query)
                    ));
                }
                line
            }
            Instruction::SetRequestBody {
                parameter,
                kind,
                content_type,
                adapter,
            } => format!(
                "request_info.set_{}_content({}, {}, {})",
                format!("{kind:?}").to_lowercase(),
                adapter.as_deref().map(|a| format!("self.{}", self.member(a))).unwrap_or_else(|| "none".to_string()),
                content_type.as_deref().map(|c| format!("{c:?}")).unwrap_or_else(|| "none".to_string()),
                self.member(parameter)
            ),
            Instruction::InvokeGenerator { method, arguments } => {
                let args: Vec<String> = arguments.iter().map(|a| self.member(a)).collect();
                format!("request_info = self.{}({})", self.member(method), args.join(", "))
            }
            Instruction::ErrorMapping { entries } => {
                let pairs: Vec<String> = entries
                    .iter()
                    .map(|e| format!("{:?}: {}", e.code, self.conventions.type_name(&e.type_name)))
                    .collect();
                format!("error_mapping = {{{}}}", pairs.join(", "))
            }
            Instruction::Send { mode, type_name } => format!(
                "return send[{mode:?}](request_info, {})",
                type_name.as_deref().unwrap_or("none")
            ),
            Instruction::MapQueryParameter { from, to } => {
                format!("if original_name == {from:?}: return {to:?}")
            }
            Instruction::BuildRequestBuilder {
                type_name,
                path_parameters,
                adapter,
                segments,
            } => {
                let mut params = path_parameters
                    .as_deref()
                    .map(|p| format!("copy(self.{})", self.member(p)))
                    .unwrap_or_else(|| "{}".to_string());
                for segment in segments {
                    params.push_str(&format!(
                        " + {{{:?}: {}}}",
                        segment.serialization_name,
                        self.member(&segment.parameter)
                    ));
                }
                let adapter = adapter
                    .as_deref()
                    .map(|a| format!("self.{}", self.member(a)))
                    .unwrap_or_else(|| "none".to_string());
                format!(
                    "return {}({adapter}, {params})",
                    self.conventions.type_name(type_name)
                )
            }
            Instruction::ReadField { property } => format!("return self.{}", self.member(property)),
            Instruction::WriteField {
                property,
                parameter,
            } => format!("self.{} = {}", self.member(property), self.member(parameter)),
            Instruction::ReadBackingStore {
                store,
                key,
                lazy_default,
            } => match lazy_default {
                Some(default) => format!(
                    "return self.{}.get_or_set({:?}, {default})",
                    self.member(store),
                    self.member(key)
                ),
                None => format!("return self.{}.get({:?})", self.member(store), self.member(key)),
            },
            Instruction::WriteBackingStore {
                store,
                key,
                parameter,
            } => format!(
                "self.{}[{:?}] = {}",
                self.member(store),
                self.member(key),
                self.member(parameter)
            ),
            Instruction::Return { value } => format!("return {}", self.render_operand(value)),
            Instruction::Branch { .. } => String::new(),
        };
        code.push_str(&INDENT.repeat(depth));
        code.push_str(&line);
        code.push('\n');
    }
}
