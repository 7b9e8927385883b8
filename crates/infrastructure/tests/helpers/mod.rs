#![allow(dead_code)]
mod responder;
mod smp_server;

pub use responder::{ask, exchange, silent_nameserver, RunningResponder};
pub use smp_server::{MockSmp, SmpBehavior};

pub const SMP_NAMESPACE_METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smp:SignedServiceMetadata xmlns:smp="http://busdox.org/serviceMetadata/publishing/1.0/"
                           xmlns:wsa="http://www.w3.org/2005/08/addressing">
  <smp:ServiceMetadata>
    <smp:ServiceInformation>
      <smp:ProcessList>
        <smp:Process>
          <smp:ServiceEndpointList>
            <smp:Endpoint transportProfile="peppol-transport-as4-v2_0">
              <wsa:EndpointReference>
                <wsa:Address>https://ap.example.test/as4</wsa:Address>
              </wsa:EndpointReference>
              <smp:Certificate>MIIC-integration-cert</smp:Certificate>
              <smp:ServiceDescription>Integration access point</smp:ServiceDescription>
            </smp:Endpoint>
          </smp:ServiceEndpointList>
        </smp:Process>
      </smp:ProcessList>
    </smp:ServiceInformation>
  </smp:ServiceMetadata>
</smp:SignedServiceMetadata>"#;
