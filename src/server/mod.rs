// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! The processing logic of a minimal DNS responder.
//!
//! The [`Responder`] structure is the heart of this module; see its
//! documentation for details.

use std::net::Ipv4Addr;

use log::debug;

use crate::class::Class;
use crate::message::{Cursor, Header, Message, Opcode, Rcode};
use crate::rr::{Rdata, ResourceRecord, Ttl, Type};

////////////////////////////////////////////////////////////////////////
// RESPONDER                                                          //
////////////////////////////////////////////////////////////////////////

/// A DNS responder that answers every address query with one fixed
/// IPv4 address, abstracted from any underlying network I/O.
///
/// The `Responder` receives, decodes, and responds to DNS messages
/// through the [`Responder::handle_message`] method. An I/O provider
/// (see [`crate::io`]) is responsible for receiving these messages from
/// the network and then sending the responses that the `Responder`
/// produces.
pub struct Responder {
    answer: Ipv4Addr,
    ttl: Ttl,
}

impl Responder {
    /// Creates a new `Responder` that answers with `answer`, using
    /// `ttl` as the TTL of the records it produces.
    pub fn new(answer: Ipv4Addr, ttl: Ttl) -> Self {
        Self { answer, ttl }
    }

    /// Returns the address the `Responder` answers with.
    pub fn answer(&self) -> Ipv4Addr {
        self.answer
    }

    /// Returns the TTL of the records the `Responder` produces.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Handles a received DNS message. This is the API through which
    /// I/O providers submit messages.
    ///
    /// `received` contains the message received. If a response is to be
    /// sent, its on-the-wire form is returned.
    ///
    /// * Datagrams too short to hold a header, and messages that are
    ///   themselves responses, are ignored.
    /// * A message that cannot be decoded gets a header-only FORMERR
    ///   response.
    /// * A message with an opcode other than QUERY gets a header-only
    ///   NOTIMP response.
    /// * Otherwise, all questions are echoed, and each question asking
    ///   for an A record (or any record) in class IN (or any class) is
    ///   answered with the configured address.
    pub fn handle_message(&self, received: &[u8]) -> Option<Vec<u8>> {
        // Ignore messages that do not contain a full DNS header.
        let header = match Header::read(&mut Cursor::new(received)) {
            Ok(header) => header,
            Err(_) => {
                debug!("Ignoring {}-octet datagram: too short", received.len());
                return None;
            }
        };

        // Ignore messages that are responses.
        if !header.is_query {
            debug!("Ignoring response message with ID {}", header.id);
            return None;
        }

        let query = match Message::from_wire(received) {
            Ok(query) => query,
            Err(err) => {
                debug!("Message {} is malformed: {}", header.id, err);
                return self.finish_with_rcode(header, Rcode::FormErr);
            }
        };

        if query.header.opcode != Opcode::Query {
            debug!(
                "Message {} has unsupported opcode {}",
                header.id, query.header.opcode
            );
            return self.finish_with_rcode(header, Rcode::NotImp);
        }

        let mut response = Message::response_to(&query);
        for question in &query.questions {
            if self.answers(question.qtype, question.qclass) {
                debug!("Answering {} with {}", question, self.answer);
                response.answers.push(ResourceRecord {
                    owner: question.qname.clone(),
                    rr_type: Type::A,
                    class: Class::IN,
                    ttl: self.ttl,
                    rdata: Rdata::Opaque(self.answer.octets().into()),
                });
            } else {
                debug!("Not answering {}", question);
            }
        }
        self.finish(response)
    }

    /// Returns whether a question with the given QTYPE and QCLASS gets
    /// an answer.
    fn answers(&self, qtype: Type, qclass: Class) -> bool {
        matches!(qtype, Type::A | Type::ANY) && matches!(qclass, Class::IN | Class::ANY)
    }

    /// Encodes a header-only response to a message with the given
    /// header.
    fn finish_with_rcode(&self, header: Header, rcode: Rcode) -> Option<Vec<u8>> {
        let mut response = Message::new(header.response());
        response.header.rcode = rcode;
        self.finish(response)
    }

    /// Encodes a response, logging (and dropping) it if that fails.
    fn finish(&self, response: Message) -> Option<Vec<u8>> {
        match response.to_wire() {
            Ok(octets) => Some(octets),
            Err(err) => {
                debug!("Failed to encode response {}: {}", response.header.id, err);
                None
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Question;
    use crate::name::Name;

    fn responder() -> Responder {
        Responder::new(Ipv4Addr::new(192, 0, 2, 1), Ttl::from(300))
    }

    fn query(qtype: Type, qclass: Class) -> Message {
        let question = Question {
            qname: "Host.Example.".parse().unwrap(),
            qtype,
            qclass,
        };
        let mut message = Message::new_query(question, true);
        message.header.id = 0x1234;
        message
    }

    fn handle(message: &Message) -> Message {
        let received = message.to_wire().unwrap();
        let response = responder().handle_message(&received).unwrap();
        Message::from_wire(&response).unwrap()
    }

    #[test]
    fn a_queries_are_answered() {
        let query = query(Type::A, Class::IN);
        let response = handle(&query);
        assert_eq!(response.header.id, 0x1234);
        assert!(!response.header.is_query);
        assert!(response.header.rd);
        assert!(!response.header.aa && !response.header.ra);
        assert_eq!(response.header.rcode, Rcode::NoError);
        assert_eq!(response.questions, query.questions);
        assert_eq!(
            response.answers,
            [ResourceRecord {
                owner: "Host.Example.".parse::<Name>().unwrap(),
                rr_type: Type::A,
                class: Class::IN,
                ttl: Ttl::from(300),
                rdata: Rdata::Opaque(vec![192, 0, 2, 1].into()),
            }]
        );
        assert!(response.authorities.is_empty());
        assert!(response.additionals.is_empty());
    }

    #[test]
    fn any_queries_are_answered() {
        assert_eq!(handle(&query(Type::ANY, Class::ANY)).answers.len(), 1);
        assert_eq!(handle(&query(Type::A, Class::ANY)).answers.len(), 1);
    }

    #[test]
    fn other_queries_get_no_answers() {
        for (qtype, qclass) in [(Type::AAAA, Class::IN), (Type::A, Class::CH)] {
            let query = query(qtype, qclass);
            let response = handle(&query);
            assert_eq!(response.header.rcode, Rcode::NoError);
            assert_eq!(response.questions, query.questions);
            assert!(response.answers.is_empty());
        }
    }

    #[test]
    fn every_question_is_echoed() {
        let mut query = query(Type::A, Class::IN);
        query.questions.push(Question {
            qname: Name::root(),
            qtype: Type::NS,
            qclass: Class::IN,
        });
        let response = handle(&query);
        assert_eq!(response.questions, query.questions);
        assert_eq!(response.answers.len(), 1);
    }

    #[test]
    fn short_messages_are_ignored() {
        assert_eq!(responder().handle_message(b""), None);
        assert_eq!(responder().handle_message(&[0; 11]), None);
    }

    #[test]
    fn responses_are_ignored() {
        let mut message = query(Type::A, Class::IN);
        message.header.is_query = false;
        let received = message.to_wire().unwrap();
        assert_eq!(responder().handle_message(&received), None);
    }

    #[test]
    fn malformed_messages_get_formerr() {
        let mut received = query(Type::A, Class::IN).to_wire().unwrap();
        received.truncate(received.len() - 1);
        let response = responder().handle_message(&received).unwrap();
        assert_eq!(response.len(), 12);
        let response = Message::from_wire(&response).unwrap();
        assert_eq!(response.header.id, 0x1234);
        assert_eq!(response.header.rcode, Rcode::FormErr);
        assert!(response.header.rd);
        assert!(response.questions.is_empty());
    }

    #[test]
    fn other_opcodes_get_notimp() {
        let mut message = query(Type::A, Class::IN);
        message.header.opcode = Opcode::Status;
        let response = handle(&message);
        assert_eq!(response.header.opcode, Opcode::Status);
        assert_eq!(response.header.rcode, Rcode::NotImp);
        assert!(response.questions.is_empty());
        assert!(response.answers.is_empty());
    }
}
