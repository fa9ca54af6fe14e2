use log::debug;
use std::io::Write;
use wsdlgen_util::xml::NO_ATTRIBUTES;

use crate::{
    error::Error,
    naming::schema_name,
    namespaces::{HTTP_TRANSPORT, SOAP11_ENCODING, SOAP12_ENCODING},
    registry::TypeRegistry,
    schema::{XSD_COMPLEX_TYPE, XSD_ELEMENT, XSD_SEQUENCE},
    session::Session,
    types::{
        AddressingVersion, BodyUse, EnvelopeVersion, Operation, OperationStyle, Parameter,
        TypeKind, TypeRef,
    },
};

const WSDL_DEFINITIONS: &str = "wsdl:definitions";
const WSDL_TYPES: &str = "wsdl:types";
const WSDL_MESSAGE: &str = "wsdl:message";
const WSDL_PART: &str = "wsdl:part";
const WSDL_PORT_TYPE: &str = "wsdl:portType";
const WSDL_BINDING: &str = "wsdl:binding";
const WSDL_OPERATION: &str = "wsdl:operation";
const WSDL_INPUT: &str = "wsdl:input";
const WSDL_OUTPUT: &str = "wsdl:output";
const WSDL_SERVICE: &str = "wsdl:service";
const WSDL_PORT: &str = "wsdl:port";

impl OperationStyle {
    fn as_str(&self) -> &'static str {
        match self {
            OperationStyle::Document => "document",
            OperationStyle::Rpc => "rpc",
        }
    }
}

impl BodyUse {
    fn as_str(&self) -> &'static str {
        match self {
            BodyUse::Literal => "literal",
            BodyUse::Encoded => "encoded",
        }
    }
}

impl<'a, W: Write> Session<'a, W> {
    /// Writes the whole document and hands back the sink.
    pub(crate) fn write_document(mut self) -> Result<W, Error> {
        let mut attributes = self
            .namespaces
            .declarations()
            .map(|(key, namespace)| (key, namespace.to_owned()))
            .collect::<Vec<_>>();
        attributes.push(("targetNamespace".to_owned(), self.contract.namespace.clone()));
        attributes.push(("name".to_owned(), self.contract.service().to_owned()));

        self.out.declaration()?;
        self.out.start(WSDL_DEFINITIONS, attributes)?;

        self.write_types()?;
        self.write_messages()?;
        self.write_port_type()?;
        self.write_binding()?;
        self.write_service()?;

        self.out.end()?;
        Ok(self.out.into_inner())
    }

    fn write_types(&mut self) -> Result<(), Error> {
        let contract = self.contract;

        self.out.start(WSDL_TYPES, NO_ATTRIBUTES)?;
        self.open_target_schema()?;

        for operation in &contract.operations {
            debug!("writing schema elements for {}", operation.name);
            self.write_request_element(operation)?;
            self.write_response_element(operation)?;
        }

        self.drain_complex_types()?;
        self.drain_enums()?;
        self.out.end()?;

        self.drain_array_blocks()?;

        if self.needs_date_time_offset {
            self.write_date_time_offset()?;
        }

        self.out.end()?;
        Ok(())
    }

    fn write_request_element(&mut self, operation: &'a Operation) -> Result<(), Error> {
        if !operation.is_message_contract_request && operation.in_parameters.is_empty() {
            return self.write_empty_element(&operation.name);
        }

        let parameters = operation.request_parameters();
        self.write_parameters(
            &operation.name,
            &parameters,
            operation.is_message_contract_request,
        )
    }

    /// `{Operation}Response`, written the same way for synchronous and
    /// task-wrapped results.
    fn write_response_element(&mut self, operation: &'a Operation) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;
        let element_name = format!("{}Response", operation.name);
        let result = match &operation.return_type {
            Some(ty) => registry.unwrap_task(ty)?,
            None => None,
        };

        if operation.is_message_contract_response {
            let result_parameter = result
                .map(|ty| Parameter::new(format!("{}Result", operation.name), ty.clone()));
            let mut parameters = result_parameter
                .iter()
                .chain(operation.out_parameters.iter())
                .collect::<Vec<_>>();
            Parameter::sort_by_order(&mut parameters);

            return self.write_parameters(&element_name, &parameters, true);
        }

        if result.is_none() && operation.out_parameters.is_empty() {
            return self.write_empty_element(&element_name);
        }

        self.open_operation_element(&element_name)?;

        if let Some(result) = result {
            let descriptor = registry.get(result)?;
            if let TypeKind::Object = descriptor.kind {
                for member in descriptor.members.iter().filter(|member| !member.ignore) {
                    self.add_schema_type(&member.ty, Some(&member.name), false, None)?;
                }
            } else {
                let result_name = format!("{}Result", operation.name);
                self.add_schema_type(result, Some(&result_name), false, None)?;
            }
        }

        for parameter in &operation.out_parameters {
            self.add_schema_type(
                &parameter.ty,
                Some(parameter.member_name()),
                false,
                parameter.namespace.as_deref(),
            )?;
        }

        self.close_operation_element()
    }

    /// One element with an inline complex type holding the parameters. In
    /// message-contract mode only wrapped contracts are written inline;
    /// unwrapped contracts are queued and stand for the whole message.
    fn write_parameters(
        &mut self,
        element_name: &str,
        parameters: &[&Parameter],
        message_contract: bool,
    ) -> Result<(), Error> {
        let registry: &'a TypeRegistry = self.registry;
        self.open_operation_element(element_name)?;

        for parameter in parameters {
            if message_contract {
                let descriptor = registry.get(&parameter.ty)?;
                if descriptor.is_unwrapped_message_contract() {
                    self.message_body_type(descriptor)?;
                    self.queues.enqueue_complex(&parameter.ty);
                    continue;
                }
            }

            self.add_schema_type(
                &parameter.ty,
                Some(parameter.member_name()),
                false,
                parameter.namespace.as_deref(),
            )?;
        }

        self.close_operation_element()
    }

    fn open_operation_element(&mut self, name: &str) -> Result<(), Error> {
        self.out.start(XSD_ELEMENT, [("name", name)])?;
        self.out.start(XSD_COMPLEX_TYPE, NO_ATTRIBUTES)?;
        self.out.start(XSD_SEQUENCE, NO_ATTRIBUTES)?;
        Ok(())
    }

    fn close_operation_element(&mut self) -> Result<(), Error> {
        self.out.end()?;
        self.out.end()?;
        self.out.end()?;
        Ok(())
    }

    fn write_empty_element(&mut self, name: &str) -> Result<(), Error> {
        self.out.start(XSD_ELEMENT, [("name", name)])?;
        self.out.empty(XSD_COMPLEX_TYPE, NO_ATTRIBUTES)?;
        self.out.end()?;
        Ok(())
    }

    /// Element carried by a message: the canonical name of the body type for
    /// unwrapped message contracts, otherwise `default`.
    fn message_element(&self, ty: Option<&TypeRef>, default: String) -> Result<String, Error> {
        let registry: &'a TypeRegistry = self.registry;
        let descriptor = match ty {
            Some(ty) => registry.get(ty)?,
            None => return Ok(default),
        };

        if !descriptor.is_unwrapped_message_contract() {
            return Ok(default);
        }

        let body = registry.get(self.message_body_type(descriptor)?)?;
        schema_name(registry, body)
    }

    fn message_name(&self, operation: &Operation, direction: &str) -> String {
        format!("{}_{}_{}Message", self.contract.name, operation.name, direction)
    }

    fn write_messages(&mut self) -> Result<(), Error> {
        let contract = self.contract;
        let registry: &'a TypeRegistry = self.registry;

        for operation in &contract.operations {
            let request = if operation.is_message_contract_request {
                operation
                    .request_parameters()
                    .first()
                    .copied()
                    .map(|parameter| &parameter.ty)
            } else {
                None
            };
            let request = self.message_element(request, operation.name.clone())?;
            let input = self.message_name(operation, "Input");
            self.write_message(&input, &request)?;

            let response = match (&operation.return_type, operation.is_message_contract_response) {
                (Some(ty), true) => registry.unwrap_task(ty)?,
                _ => None,
            };
            let response = self.message_element(response, format!("{}Response", operation.name))?;
            let output = self.message_name(operation, "Output");
            self.write_message(&output, &response)?;
        }

        Ok(())
    }

    fn write_message(&mut self, name: &str, element: &str) -> Result<(), Error> {
        let element = self.target_name(element)?;

        self.out.start(WSDL_MESSAGE, [("name", name)])?;
        self.out.empty(
            WSDL_PART,
            [("name", "parameters"), ("element", element.as_str())],
        )?;
        self.out.end()?;
        Ok(())
    }

    /// `wsam:Action`/`wsaw:Action` attribute name when addressing is on.
    fn action_attribute(&self) -> Option<&'static str> {
        match self.binding.message_version.addressing {
            AddressingVersion::None => None,
            AddressingVersion::WsAddressing10 => Some("wsam:Action"),
            AddressingVersion::WsAddressingAugust2004 => Some("wsaw:Action"),
        }
    }

    fn write_port_type(&mut self) -> Result<(), Error> {
        let contract = self.contract;

        self.out
            .start(WSDL_PORT_TYPE, [("name", contract.name.as_str())])?;

        for operation in &contract.operations {
            let input = self.target_name(&self.message_name(operation, "Input"))?;
            let output = self.target_name(&self.message_name(operation, "Output"))?;
            let action = contract.soap_action(operation);
            let response_action = format!("{}Response", action);

            let mut input_attributes = vec![("message", input.as_str())];
            let mut output_attributes = vec![("message", output.as_str())];
            if let Some(attribute) = self.action_attribute() {
                input_attributes.push((attribute, action.as_str()));
                output_attributes.push((attribute, response_action.as_str()));
            }

            self.out
                .start(WSDL_OPERATION, [("name", operation.name.as_str())])?;
            self.out.empty(WSDL_INPUT, input_attributes)?;
            self.out.empty(WSDL_OUTPUT, output_attributes)?;
            self.out.end()?;
        }

        self.out.end()?;
        Ok(())
    }

    fn write_binding(&mut self) -> Result<(), Error> {
        let contract = self.contract;
        let soap = self.soap_prefix()?.to_owned();
        let binding_name = self.binding.name.clone();
        let port_type = self.target_name(&contract.name)?;

        let soap_binding = format!("{}:binding", soap);
        let soap_operation = format!("{}:operation", soap);

        self.out.start(
            WSDL_BINDING,
            [("name", binding_name.as_str()), ("type", port_type.as_str())],
        )?;
        self.out
            .empty(&soap_binding, [("transport", HTTP_TRANSPORT)])?;

        for operation in &contract.operations {
            let action = contract.soap_action(operation);

            self.out
                .start(WSDL_OPERATION, [("name", operation.name.as_str())])?;
            self.out.empty(
                &soap_operation,
                [
                    ("soapAction", action.as_str()),
                    ("style", operation.style.as_str()),
                ],
            )?;

            self.out.start(WSDL_INPUT, NO_ATTRIBUTES)?;
            self.write_body(&soap, operation)?;
            self.out.end()?;

            self.out.start(WSDL_OUTPUT, NO_ATTRIBUTES)?;
            self.write_body(&soap, operation)?;
            self.out.end()?;

            self.out.end()?;
        }

        self.out.end()?;
        Ok(())
    }

    fn write_body(&mut self, soap: &str, operation: &Operation) -> Result<(), Error> {
        let contract = self.contract;
        let soap_body = format!("{}:body", soap);
        let mut attributes = vec![("use", operation.body_use.as_str())];

        if operation.body_use == BodyUse::Encoded {
            let encoding = match self.binding.message_version.envelope {
                EnvelopeVersion::Soap11 => SOAP11_ENCODING,
                EnvelopeVersion::Soap12 => SOAP12_ENCODING,
            };

            attributes.push(("encodingStyle", encoding));
            attributes.push(("namespace", contract.namespace.as_str()));
        }

        self.out.empty(&soap_body, attributes)?;
        Ok(())
    }

    fn write_service(&mut self) -> Result<(), Error> {
        let soap_address = format!("{}:address", self.soap_prefix()?);
        let binding_name = self.binding.name.clone();
        let binding = self.target_name(&binding_name)?;
        let location = self.options.base_url.to_string();
        let contract = self.contract;

        self.out
            .start(WSDL_SERVICE, [("name", contract.service())])?;
        self.out.start(
            WSDL_PORT,
            [("name", binding_name.as_str()), ("binding", binding.as_str())],
        )?;
        self.out
            .empty(&soap_address, [("location", location.as_str())])?;
        self.out.end()?;
        self.out.end()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Options,
        types::{BindingDescriptor, Member, MessageVersion, ServiceContract, TypeDescriptor},
    };
    use url::Url;

    fn options() -> Options {
        Options::new(Url::parse("http://localhost/").unwrap())
    }

    #[test]
    fn message_names() {
        let registry = TypeRegistry::new();
        let contract = ServiceContract::new("IService", "http://tempuri.org/");
        let options = options();
        let session = Session::new(&contract, &registry, &options, Vec::<u8>::new());

        let operation = Operation::new("Echo");
        assert_eq!(
            session.message_name(&operation, "Input"),
            "IService_Echo_InputMessage"
        );
        assert_eq!(
            session.message_element(None, "Echo".to_owned()).unwrap(),
            "Echo"
        );
        assert_eq!(session.action_attribute(), None);
    }

    #[test]
    fn unwrapped_message_element() {
        let mut registry = TypeRegistry::new();
        let body = registry.insert("Body", TypeDescriptor::object("Body").with_schema_name("Carried"));
        let request = registry.insert(
            "Request",
            TypeDescriptor::message_contract("Request", false)
                .with_member(Member::new("Body", body).body(0)),
        );

        let contract = ServiceContract::new("IService", "http://tempuri.org/");
        let options = options().with_binding(BindingDescriptor::new(
            "Binding",
            MessageVersion::SOAP12_WS_ADDRESSING_AUGUST2004,
        ));
        let session = Session::new(&contract, &registry, &options, Vec::<u8>::new());

        assert_eq!(
            session.message_element(Some(&request), "Send".to_owned()).unwrap(),
            "Carried"
        );
        assert_eq!(session.action_attribute(), Some("wsaw:Action"));
        assert_eq!(session.soap_prefix().unwrap(), "soap12");
    }

    #[test]
    fn binding_keywords() {
        assert_eq!(OperationStyle::Document.as_str(), "document");
        assert_eq!(OperationStyle::Rpc.as_str(), "rpc");
        assert_eq!(BodyUse::Literal.as_str(), "literal");
        assert_eq!(BodyUse::Encoded.as_str(), "encoded");
    }
}
